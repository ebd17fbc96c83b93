// Parsers for git's machine-readable output.

use reposync_common::state::{CommitSummary, StatusEntry};

/// Separator used in the `--format` passed to `git log`.
pub const LOG_FIELD_SEPARATOR: char = '\t';

/// Parse `git status --porcelain=v1 -z` output.
///
/// Records are NUL-terminated and paths are never quoted. A rename or copy
/// is followed by an extra record holding the source path; the entry keeps
/// the destination.
pub fn parse_status(output: &str) -> Vec<StatusEntry> {
    let mut entries = Vec::new();
    let mut records = output.split('\0');
    while let Some(record) = records.next() {
        let Some(entry) = parse_status_record(record) else {
            continue;
        };
        if is_rename_or_copy(entry.index) || is_rename_or_copy(entry.worktree) {
            records.next();
        }
        entries.push(entry);
    }
    entries
}

fn parse_status_record(record: &str) -> Option<StatusEntry> {
    let mut chars = record.chars();
    let index = chars.next()?;
    let worktree = chars.next()?;
    let path = record.get(3..).filter(|path| !path.is_empty())?;
    Some(StatusEntry { index, worktree, path: path.to_string() })
}

fn is_rename_or_copy(code: char) -> bool {
    matches!(code, 'R' | 'C')
}

/// Parse `git log --format=%h%x09%s` output.
pub fn parse_history(output: &str) -> Vec<CommitSummary> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once(LOG_FIELD_SEPARATOR) {
            Some((id, subject)) => {
                CommitSummary { id: id.to_string(), subject: subject.to_string() }
            }
            None => CommitSummary { id: line.to_string(), subject: String::new() },
        })
        .collect()
}

/// NUL-separated paths, e.g. from `git diff --name-only -z`.
pub fn parse_paths(output: &str) -> Vec<String> {
    output.split('\0').filter(|path| !path.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_staged_unstaged_and_untracked_entries() {
        let entries = parse_status("M  src/lib.rs\0 M README.md\0?? notes.txt\0");
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            StatusEntry { index: 'M', worktree: ' ', path: "src/lib.rs".into() }
        );
        assert_eq!(entries[1].code(), " M");
        assert!(entries[2].is_untracked());
    }

    #[test]
    fn rename_reports_new_path_and_skips_source_record() {
        let entries = parse_status("R  new/name.rs\0old/name.rs\0 M other.rs\0");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "new/name.rs");
        assert_eq!(entries[1].path, "other.rs");
    }

    #[test]
    fn special_and_non_ascii_paths_are_kept_verbatim() {
        let entries = parse_status("?? with space \"q\".txt\0UU café.txt\0");
        assert_eq!(entries[0].path, "with space \"q\".txt");
        assert_eq!(entries[1].path, "café.txt");
        assert!(entries[1].is_unmerged());
    }

    #[test]
    fn empty_status_is_clean() {
        assert!(parse_status("").is_empty());
        assert!(parse_status("\0").is_empty());
    }

    #[test]
    fn history_splits_id_and_subject() {
        let history = parse_history("abc1234\tfix: handle empty input\ndef5678\tinitial\n");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "abc1234");
        assert_eq!(history[0].subject, "fix: handle empty input");
    }

    #[test]
    fn paths_split_on_nul_and_keep_spaces() {
        assert_eq!(
            parse_paths("a.txt\0\0 b c.txt\0naïve.rs\0"),
            vec!["a.txt", " b c.txt", "naïve.rs"]
        );
    }
}
