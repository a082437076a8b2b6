//! Process-wide update state: single-flight flag plus cooldown window

use super::cooldown::CooldownGate;
use crate::error::{UpdaterError, UpdaterResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
struct Inner {
    running: bool,
    cooldown: CooldownGate,
}

/// Point-in-time view of the update gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSnapshot {
    pub running: bool,
    pub can_attempt: bool,
    pub remaining_secs: u64,
}

impl GateSnapshot {
    /// Whether a start request would be accepted right now
    pub fn can_update(&self) -> bool {
        self.can_attempt && !self.running
    }
}

/// Shared update state
///
/// Checking the flag, checking the cooldown and claiming the run happen
/// under one lock, so two simultaneous start requests cannot both win.
#[derive(Debug)]
pub struct UpdateState {
    inner: Mutex<Inner>,
}

impl UpdateState {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                running: false,
                cooldown: CooldownGate::new(cooldown),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the right to run an update.
    ///
    /// On success the cooldown window starts and the returned guard keeps the
    /// run marked active until it is dropped.
    pub fn try_begin(self: &Arc<Self>) -> UpdaterResult<RunGuard> {
        let mut inner = self.lock();

        if inner.running {
            return Err(UpdaterError::AlreadyRunning);
        }
        if !inner.cooldown.can_attempt() {
            return Err(UpdaterError::CooldownActive {
                remaining_secs: inner.cooldown.remaining_secs(),
            });
        }

        inner.running = true;
        inner.cooldown.record_attempt_now();
        debug!("Update run claimed");

        Ok(RunGuard {
            state: Arc::clone(self),
        })
    }

    /// Read the gate without changing it
    pub fn snapshot(&self) -> GateSnapshot {
        let inner = self.lock();
        GateSnapshot {
            running: inner.running,
            can_attempt: inner.cooldown.can_attempt(),
            remaining_secs: inner.cooldown.remaining_secs(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    fn release(&self) {
        self.lock().running = false;
        debug!("Update run released");
    }
}

/// Marks an update run as active for as long as it lives
#[derive(Debug)]
pub struct RunGuard {
    state: Arc<UpdateState>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.state.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn second_claim_while_running_is_rejected() {
        let state = Arc::new(UpdateState::new(Duration::ZERO));

        let guard = state.try_begin().unwrap();
        assert!(state.is_running());
        assert!(matches!(
            state.try_begin().unwrap_err(),
            UpdaterError::AlreadyRunning
        ));

        drop(guard);
        assert!(!state.is_running());
        assert!(state.try_begin().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn claim_during_cooldown_is_rejected() {
        let state = Arc::new(UpdateState::new(Duration::from_secs(300)));

        drop(state.try_begin().unwrap());
        match state.try_begin().unwrap_err() {
            UpdaterError::CooldownActive { remaining_secs } => assert_eq!(remaining_secs, 300),
            other => panic!("expected cooldown, got {other:?}"),
        }

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(state.try_begin().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn running_takes_precedence_over_cooldown() {
        let state = Arc::new(UpdateState::new(Duration::from_secs(300)));
        let _guard = state.try_begin().unwrap();
        assert!(matches!(
            state.try_begin().unwrap_err(),
            UpdaterError::AlreadyRunning
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_does_not_mutate() {
        let state = Arc::new(UpdateState::new(Duration::from_secs(60)));
        let before = state.snapshot();
        assert!(before.can_update());

        let guard = state.try_begin().unwrap();
        let during = state.snapshot();
        assert!(during.running);
        assert!(!during.can_update());
        assert_eq!(during.remaining_secs, 60);
        drop(guard);

        assert_eq!(state.snapshot(), state.snapshot());
    }

    #[test]
    fn guard_released_on_panic() {
        let state = Arc::new(UpdateState::new(Duration::ZERO));
        let cloned = Arc::clone(&state);
        let result = std::thread::spawn(move || {
            let _guard = cloned.try_begin().unwrap();
            panic!("stage blew up");
        })
        .join();

        assert!(result.is_err());
        assert!(!state.is_running());
    }
}
