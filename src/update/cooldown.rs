//! Minimum interval between update attempts

use std::time::Duration;
use tokio::time::Instant;

/// Tracks when the last update attempt started
///
/// The window is measured from attempt start, so a slow or failed run still
/// occupies it.
#[derive(Debug, Clone)]
pub struct CooldownGate {
    interval: Duration,
    last_attempt: Option<Instant>,
}

impl CooldownGate {
    /// Create a gate with no recorded attempt
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_attempt: None,
        }
    }

    /// Whether a new attempt may start now
    pub fn can_attempt(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Time left until the next attempt is allowed
    pub fn remaining(&self) -> Duration {
        match self.last_attempt {
            Some(at) => self.interval.saturating_sub(at.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Whole seconds left, rounded up so a blocked gate never reports zero
    pub fn remaining_secs(&self) -> u64 {
        let remaining = self.remaining();
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    /// Start a new cooldown window now
    pub fn record_attempt_now(&mut self) {
        self.last_attempt = Some(Instant::now());
    }
}
