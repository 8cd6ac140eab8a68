//! Synthetic upload progress.
//!
//! Progress is not tied to any data transfer: a timer advances each staged
//! entry by a fixed increment until it reaches 100. The timer itself is
//! injected into [`run`] so the loop works with browser timers and with
//! ready futures in tests alike.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Completed progress value.
pub const COMPLETE: u8 = 100;

/// Percentage in `[0, 100]` that only moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Progress(u8);

impl Progress {
    /// Progress at zero.
    pub const ZERO: Self = Self(0);

    /// Progress at completion.
    pub const DONE: Self = Self(COMPLETE);

    /// Current percentage.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// Whether progress has reached 100.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 >= COMPLETE
    }

    /// Advance by `increment`, clamped at 100.
    #[must_use]
    pub fn advance(self, increment: u8) -> Self {
        Self(self.0.saturating_add(increment).min(COMPLETE))
    }
}

/// Errors in a [`ProgressSchedule`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Tick period of zero would spin.
    #[error("tick period must be at least 1 ms")]
    ZeroPeriod,

    /// Increment outside `1..=100`.
    #[error("increment must be between 1 and 100, got {0}")]
    Increment(u8),
}

/// Timing of the progress simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressSchedule {
    /// Milliseconds between ticks.
    pub period_ms: u32,
    /// Percentage points added per tick.
    pub increment: u8,
}

impl Default for ProgressSchedule {
    fn default() -> Self {
        Self {
            period_ms: 100,
            increment: 5,
        }
    }
}

impl ProgressSchedule {
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] for a zero period or an increment
    /// outside `1..=100`.
    pub const fn validate(&self) -> Result<(), ScheduleError> {
        if self.period_ms == 0 {
            return Err(ScheduleError::ZeroPeriod);
        }
        if self.increment == 0 || self.increment > COMPLETE {
            return Err(ScheduleError::Increment(self.increment));
        }
        Ok(())
    }

    /// Tick period as a [`Duration`].
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(u64::from(self.period_ms))
    }

    /// Number of ticks from zero to completion.
    #[must_use]
    pub fn ticks_to_complete(&self) -> u32 {
        u32::from(COMPLETE.div_ceil(self.increment.max(1)))
    }

    /// Simulated time from zero to completion.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.period() * self.ticks_to_complete()
    }
}

/// Cancellation flag shared between a staged entry and its timer.
///
/// Clones observe the same flag. Cancelling is idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    /// Create a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the timer bound to this token.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Result of applying one tick to the staging store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Progress moved but is not yet complete.
    Advanced(Progress),
    /// Progress reached 100 on this tick and the entry is marked successful.
    Completed,
    /// No entry with that id exists (removed, or store gone).
    Missing,
    /// The store could not be written right now; nothing changed and the
    /// next period tries again.
    Deferred,
}

/// Why a simulation loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEnd {
    /// The entry reached 100.
    Completed,
    /// The token was cancelled.
    Cancelled,
    /// The entry disappeared without its token being cancelled.
    Vanished,
}

/// Drive one entry's progress until completion or cancellation.
///
/// Each iteration waits one period via `sleep`, checks the token, then
/// calls `tick` with the schedule's increment. The token is checked after
/// every wake, so a cancelled entry never receives another write.
pub async fn run<S, F, T>(
    schedule: ProgressSchedule,
    token: &CancelToken,
    mut sleep: S,
    mut tick: T,
) -> SimulationEnd
where
    S: FnMut(Duration) -> F,
    F: Future<Output = ()>,
    T: FnMut(u8) -> Tick,
{
    loop {
        if token.is_cancelled() {
            return SimulationEnd::Cancelled;
        }
        sleep(schedule.period()).await;
        if token.is_cancelled() {
            return SimulationEnd::Cancelled;
        }
        match tick(schedule.increment) {
            Tick::Advanced(_) | Tick::Deferred => {}
            Tick::Completed => return SimulationEnd::Completed,
            Tick::Missing => return SimulationEnd::Vanished,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;

    use super::*;

    #[test]
    fn advance_clamps_at_complete() {
        let p = Progress::ZERO.advance(95).advance(5);
        assert_eq!(p, Progress::DONE);
        assert_eq!(Progress(98).advance(5).percent(), 100);
        assert_eq!(Progress(99).advance(u8::MAX).percent(), 100);
        assert!(!Progress(99).is_complete());
    }

    #[test]
    fn default_schedule_takes_two_seconds() {
        let s = ProgressSchedule::default();
        assert_eq!(s.ticks_to_complete(), 20);
        assert_eq!(s.duration(), Duration::from_secs(2));
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn uneven_increment_rounds_tick_count_up() {
        let s = ProgressSchedule {
            period_ms: 10,
            increment: 30,
        };
        assert_eq!(s.ticks_to_complete(), 4);
    }

    #[test]
    fn schedule_validation() {
        let zero = ProgressSchedule {
            period_ms: 0,
            ..ProgressSchedule::default()
        };
        assert_eq!(zero.validate(), Err(ScheduleError::ZeroPeriod));
        let big = ProgressSchedule {
            increment: 101,
            ..ProgressSchedule::default()
        };
        assert_eq!(big.validate(), Err(ScheduleError::Increment(101)));
    }

    #[test]
    fn run_stops_on_completion() {
        let token = CancelToken::new();
        let mut progress = Progress::ZERO;
        let mut ticks = 0;
        let end = block_on(run(
            ProgressSchedule::default(),
            &token,
            |_| async {},
            |inc| {
                ticks += 1;
                progress = progress.advance(inc);
                if progress.is_complete() {
                    Tick::Completed
                } else {
                    Tick::Advanced(progress)
                }
            },
        ));
        assert_eq!(end, SimulationEnd::Completed);
        assert_eq!(ticks, 20);
    }

    #[test]
    fn cancel_during_sleep_prevents_the_next_tick() {
        let token = CancelToken::new();
        let sleeps = RefCell::new(0);
        let writes = RefCell::new(0);
        let end = block_on(run(
            ProgressSchedule::default(),
            &token,
            |_| {
                *sleeps.borrow_mut() += 1;
                if *sleeps.borrow() == 4 {
                    token.cancel();
                }
                async {}
            },
            |_| {
                *writes.borrow_mut() += 1;
                Tick::Advanced(Progress::ZERO)
            },
        ));
        assert_eq!(end, SimulationEnd::Cancelled);
        assert_eq!(*writes.borrow(), 3);
    }

    #[test]
    fn missing_entry_ends_loop() {
        let token = CancelToken::new();
        let end = block_on(run(
            ProgressSchedule::default(),
            &token,
            |_| async {},
            |_| Tick::Missing,
        ));
        assert_eq!(end, SimulationEnd::Vanished);
    }

    #[test]
    fn deferred_tick_keeps_the_loop_running() {
        let token = CancelToken::new();
        let mut calls = 0;
        let end = block_on(run(
            ProgressSchedule::default(),
            &token,
            |_| async {},
            |_| {
                calls += 1;
                if calls < 3 { Tick::Deferred } else { Tick::Completed }
            },
        ));
        assert_eq!(end, SimulationEnd::Completed);
        assert_eq!(calls, 3);
    }

    #[test]
    fn token_clones_share_state() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        a.cancel();
        assert!(b.is_cancelled());
    }
}
