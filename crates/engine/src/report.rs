// Progress reporting seam between the workflow and whatever renders it.

/// Receives progress while an action runs. Final outcomes travel in
/// `ActionResult`, not through the reporter.
pub trait Reporter {
    /// A client operation is about to start.
    fn step(&self, message: &str);
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Discards all progress (JSON output, embedding).
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn step(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}
