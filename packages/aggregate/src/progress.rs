//! Progress reporting for multi-document runs.
//!
//! The driver reports through [`ProgressCallback`] so that it does not
//! depend on any rendering backend. The CLI plugs in an `indicatif` bar;
//! tests and library callers get [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates while documents are read.
pub trait ProgressCallback: Send + Sync {
    /// Sets the number of documents to read.
    fn set_total(&self, total: u64);

    /// Advances by `delta` documents.
    fn inc(&self, delta: u64);

    /// Shows which document is being read.
    fn set_message(&self, msg: String);

    /// Marks the run as finished with a final message.
    fn finish(&self, msg: String);
}

/// A [`ProgressCallback`] that ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
