use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::debug;

/// Identifies one armed cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub(crate) u64);

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("cadence {0:?} is still armed, cancel it first")]
    AlreadyArmed(TickHandle),
    #[error("tick interval must be positive")]
    ZeroInterval,
}

/// Source of periodic ticks.
///
/// At most one cadence is live at a time. Changing speed is `cancel` followed by
/// a fresh `schedule_repeating`; an armed cadence is never modified in place.
pub trait Scheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> Result<TickHandle, SchedulerError>;
    fn cancel(&mut self, handle: TickHandle);
}

struct Armed {
    handle: TickHandle,
    interval: Interval,
}

/// Scheduler backed by a tokio interval, polled from the game loop via [`TokioScheduler::tick`]
#[derive(Default)]
pub struct TokioScheduler {
    next_id: u64,
    armed: Option<Armed>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Wait for the next tick of the armed cadence.
    ///
    /// Never resolves while nothing is armed.
    pub async fn tick(&mut self) -> TickHandle {
        match self.armed.as_mut() {
            Some(armed) => {
                armed.interval.tick().await;
                armed.handle
            }
            None => std::future::pending().await,
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> Result<TickHandle, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        if let Some(armed) = &self.armed {
            return Err(SchedulerError::AlreadyArmed(armed.handle));
        }

        self.next_id += 1;
        let handle = TickHandle(self.next_id);

        // First tick fires one full period from now
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.armed = Some(Armed { handle, interval });

        debug!(?handle, period_ms = period.as_millis() as u64, "Tick cadence armed");
        Ok(handle)
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.armed.as_ref().is_some_and(|armed| armed.handle == handle) {
            self.armed = None;
            debug!(?handle, "Tick cadence cancelled");
        }
    }
}
