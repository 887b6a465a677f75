//! Tuner enrichment port
//!
//! The catalog hands every channel update to a `TunerEnrichment`
//! implementation before merging it, and resets it together with the store.
//! The backend does not currently send the tuner details an implementation
//! would need, so `NoopTuner` is the default.

use crate::htsmsg::HtsMessage;

/// Hook for collecting tuner/service information from channel updates
pub trait TunerEnrichment: Send + Sync + 'static {
    /// Inspect a channel update as it arrives
    fn add_tuner_info(&self, message: &HtsMessage);

    /// Drop any state collected so far
    fn clean(&self);
}

/// Enrichment port that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTuner;

impl TunerEnrichment for NoopTuner {
    fn add_tuner_info(&self, _message: &HtsMessage) {}

    fn clean(&self) {}
}
