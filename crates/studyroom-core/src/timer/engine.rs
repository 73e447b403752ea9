//! Timer engine implementation.
//!
//! The timer engine is a tick-driven countdown state machine for a single
//! focus session. It owns no clock and no thread: the caller delivers one
//! tick per elapsed second through [`TimerEngine::tick`].
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start--> Running --pause--> Paused --resume--> Running
//! Running --(remaining hits 0)--> Stopped
//! {Running, Paused} --reset--> Stopped
//! ```
//!
//! ## Stale ticks
//!
//! Every transition out of `Running` bumps the engine's generation. A tick
//! carries the [`TickToken`] that was current when it was scheduled, so a
//! tick that was already in flight when the user paused or reset is
//! recognised and dropped instead of being applied late.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::counters::FocusCounters;
use crate::error::TimerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
}

/// Generation stamp attached to a scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u64);

/// Core timer engine.
///
/// Deserialization goes through the same checks as [`TimerEngine::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "EngineParts")]
pub struct TimerEngine {
    configured_secs: u32,
    /// Always within `0..=configured_secs`.
    remaining_secs: u32,
    state: TimerState,
    generation: u64,
}

#[derive(Deserialize)]
struct EngineParts {
    configured_secs: u32,
    remaining_secs: u32,
    state: TimerState,
    generation: u64,
}

impl TryFrom<EngineParts> for TimerEngine {
    type Error = TimerError;

    fn try_from(parts: EngineParts) -> Result<Self, TimerError> {
        let mut engine = Self::new(parts.configured_secs)?;
        if !(1..=parts.configured_secs).contains(&parts.remaining_secs) {
            return Err(TimerError::InvalidRemaining {
                remaining_secs: parts.remaining_secs,
                configured_secs: parts.configured_secs,
            });
        }
        engine.remaining_secs = parts.remaining_secs;
        engine.state = parts.state;
        engine.generation = parts.generation;
        Ok(engine)
    }
}

impl TimerEngine {
    /// Create a stopped engine for a session of `configured_secs` seconds.
    ///
    /// # Errors
    /// Returns [`TimerError::InvalidDuration`] when `configured_secs` is zero.
    pub fn new(configured_secs: u32) -> Result<Self, TimerError> {
        if configured_secs == 0 {
            return Err(TimerError::InvalidDuration { secs: 0 });
        }
        Ok(Self {
            configured_secs,
            remaining_secs: configured_secs,
            state: TimerState::Stopped,
            generation: 0,
        })
    }

    /// Convenience constructor from the focus-length preference.
    pub fn from_minutes(minutes: u32) -> Result<Self, TimerError> {
        let secs = minutes
            .checked_mul(60)
            .ok_or(TimerError::InvalidDuration {
                secs: i64::from(minutes) * 60,
            })?;
        Self::new(secs)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn configured_secs(&self) -> u32 {
        self.configured_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.configured_secs.saturating_sub(self.remaining_secs)
    }

    /// 0.0 .. 1.0 progress within the session.
    pub fn progress(&self) -> f64 {
        f64::from(self.elapsed_secs()) / f64::from(self.configured_secs)
    }

    /// Token that a tick scheduled right now must carry to be honoured.
    pub fn tick_token(&self) -> TickToken {
        TickToken(self.generation)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_secs: self.remaining_secs,
            configured_secs: self.configured_secs,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Stopped => {
                self.state = TimerState::Running;
                debug!(duration_secs = self.configured_secs, "focus session started");
                Some(Event::TimerStarted {
                    duration_secs: self.configured_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.leave_running(TimerState::Paused);
                debug!(remaining_secs = self.remaining_secs, "focus session paused");
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                debug!(remaining_secs = self.remaining_secs, "focus session resumed");
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Restore the full duration and stop. Never touches the counters.
    pub fn reset(&mut self) -> Option<Event> {
        if self.state == TimerState::Running {
            self.leave_running(TimerState::Stopped);
        } else {
            self.state = TimerState::Stopped;
        }
        self.remaining_secs = self.configured_secs;
        debug!("focus session reset");
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Apply one elapsed second.
    ///
    /// Returns `Some(Event::TimerCompleted)` when this tick finished the
    /// session. Ticks carrying a stale token, or arriving while the engine
    /// is not running, are ignored.
    pub fn tick(&mut self, token: TickToken, counters: &mut FocusCounters) -> Option<Event> {
        if self.state != TimerState::Running || token != self.tick_token() {
            trace!(?token, state = ?self.state, "dropping stale tick");
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        trace!(remaining_secs = self.remaining_secs, "tick");
        if self.remaining_secs > 0 {
            return None;
        }
        Some(self.expire(counters))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expire(&mut self, counters: &mut FocusCounters) -> Event {
        self.leave_running(TimerState::Stopped);
        let focused_minutes = self.configured_secs / 60;
        counters.record_completion(focused_minutes);
        self.remaining_secs = self.configured_secs;
        info!(
            focused_minutes,
            completed_sessions = counters.completed_sessions(),
            "focus session completed"
        );
        Event::TimerCompleted {
            focused_minutes,
            completed_sessions: counters.completed_sessions(),
            focused_minutes_today: counters.focused_minutes_today(),
            at: Utc::now(),
        }
    }

    fn leave_running(&mut self, next: TimerState) {
        self.state = next;
        self.generation = self.generation.wrapping_add(1);
    }
}
