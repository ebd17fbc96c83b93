// Human rendering of the inspected state for `reposync status` and `reposync check`.

use reposync_common::state::{RepoState, StatusSnapshot};

use crate::output::Style;

pub fn render(style: Style, state: &RepoState, snapshot: Option<&StatusSnapshot>) -> String {
    let mut lines = Vec::new();

    if state.detached {
        lines.push(style.yellow("HEAD detached (no branch checked out)"));
    } else {
        let branch = style.bold(&state.branch);
        lines.push(format!("On branch {branch} ({})", state.divergence.describe()));
    }

    let reachability =
        if state.remote_reachable { style.green("reachable") } else { style.red("unreachable") };
    lines.push(format!("  Remote {}: {reachability}", state.remote));
    if let Some(upstream) = &state.upstream {
        lines.push(format!("  Upstream: {upstream}"));
    }
    lines.push(format!(
        "  Working tree: {}",
        if state.is_dirty { "uncommitted changes" } else { "clean" }
    ));
    if state.rebase_in_progress {
        lines.push(format!(
            "  {} finish with `reposync resolve` or undo with `reposync abort`",
            style.yellow("Rebase in progress:")
        ));
    }

    let Some(snapshot) = snapshot else {
        return lines.join("\n");
    };

    if !snapshot.entries.is_empty() {
        lines.push(String::new());
        lines.push(format!("  Changes ({}):", snapshot.entries.len()));
        for entry in &snapshot.entries {
            let code = entry.code();
            let code = if entry.is_unmerged() { style.red(&code) } else { code };
            lines.push(format!("    {code} {}", entry.path));
        }
    }

    lines.push(String::new());
    if snapshot.history.is_empty() {
        lines.push("  No commits yet.".into());
    } else {
        lines.push("  Recent commits:".into());
        for commit in &snapshot.history {
            lines.push(format!("    {} {}", style.dim(&commit.id), commit.subject));
        }
    }

    lines.join("\n")
}
