use std::time::Duration;

use crate::config::StreamConfig;

/// Where a `LogStreamReader` is in its read cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Pulling the next chunk at the current offset.
    Fetching,
    /// The last fetch came back empty; asking whether the plan has finished.
    AwaitingCompletion,
    /// End of stream was returned. Terminal.
    Done,
    /// An error was returned. Terminal.
    Errored,
}

impl ReaderState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Errored)
    }
}

/// Exponential delay between empty polls: `min * 2^(attempt/5)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBackoff {
    pub min: Duration,
    pub max: Duration,
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self::from(&StreamConfig::default())
    }
}

impl From<&StreamConfig> for PollBackoff {
    fn from(cfg: &StreamConfig) -> Self {
        Self::new(cfg.poll_min(), cfg.poll_max())
    }
}

/// Floor for the delay between empty polls, so a zero setting cannot spin.
pub const MIN_POLL_DELAY: Duration = Duration::from_millis(1);

impl PollBackoff {
    pub fn new(min: Duration, max: Duration) -> Self {
        let min = min.max(MIN_POLL_DELAY);
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2f64.powf(f64::from(attempt) / 5.0);
        let millis = self.min.as_millis() as f64 * factor;
        let capped = millis.min(self.max.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}
