//! Progress reporting hooks for the batch jobs.

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each candidate file is processed.
    fn item(&self, label: &str, current: usize, total: usize);
    /// Called when the job completes.
    fn done(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn item(&self, _label: &str, _current: usize, _total: usize) {}
    fn done(&self) {}
}
