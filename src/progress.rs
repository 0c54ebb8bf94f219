// src/progress.rs
/// Lightweight progress reporting used by long-running operations (sync/process).
/// Frontends (CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the source title.
    fn begin(&mut self, _title: &str) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called after each fetched page (1-based count within the pass).
    fn page_done(&mut self, _count: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
