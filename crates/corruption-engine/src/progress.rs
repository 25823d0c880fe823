//! Round callback that streams progress to the async side.
//!
//! The simulation runs on a blocking thread; after each round this
//! callback pushes a [`ProgressUpdate`] onto an unbounded channel that the
//! async runtime drains and logs.

use rust_decimal::Decimal;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use corruption_core::RoundCallback;
use corruption_types::RoundMetrics;

/// One round's worth of progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Rounds completed so far.
    pub completed: u32,
    /// Rounds configured for the run.
    pub total: u32,
    /// Fraction of the run done, in `[0, 1]`.
    pub fraction: f64,
    /// Institution budget after the round.
    pub budget: Decimal,
    /// Corruption rate after the round.
    pub corruption_rate: Decimal,
}

/// Callback that forwards each round to a channel.
pub struct ChannelCallback {
    total: u32,
    sender: UnboundedSender<ProgressUpdate>,
}

impl ChannelCallback {
    /// Create a callback for a run of `total` rounds.
    pub const fn new(total: u32, sender: UnboundedSender<ProgressUpdate>) -> Self {
        Self { total, sender }
    }
}

impl RoundCallback for ChannelCallback {
    fn on_round(&mut self, metrics: &RoundMetrics, progress: f64) {
        let update = ProgressUpdate {
            completed: metrics.round,
            total: self.total,
            fraction: progress,
            budget: metrics.institution_budget,
            corruption_rate: metrics.corruption_rate,
        };
        // The receiver only goes away if the runtime is shutting down.
        if self.sender.send(update).is_err() {
            debug!(round = metrics.round, "Progress receiver dropped");
        }
    }
}
