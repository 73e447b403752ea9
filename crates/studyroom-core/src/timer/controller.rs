//! Screen-level owner of a focus session.
//!
//! Glues a [`TimerEngine`] to a [`Ticker`] and to the [`FocusCounters`]
//! the screen displays. Every transition out of `Running` withdraws the
//! pending tick, and a tick is only rescheduled while the engine is still
//! running after handling the previous one.

use super::counters::FocusCounters;
use super::engine::{TickToken, TimerEngine, TimerState};
use super::ticker::Ticker;
use crate::events::Event;

#[derive(Debug)]
pub struct FocusController<T: Ticker> {
    engine: TimerEngine,
    counters: FocusCounters,
    ticker: T,
}

impl<T: Ticker> FocusController<T> {
    pub fn new(engine: TimerEngine, counters: FocusCounters, ticker: T) -> Self {
        Self {
            engine,
            counters,
            ticker,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn counters(&self) -> &FocusCounters {
        &self.counters
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start()?;
        self.ticker.schedule(self.engine.tick_token());
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause()?;
        self.ticker.cancel();
        Some(event)
    }

    pub fn resume(&mut self) -> Option<Event> {
        let event = self.engine.resume()?;
        self.ticker.schedule(self.engine.tick_token());
        Some(event)
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.ticker.cancel();
        self.engine.reset()
    }

    /// Deliver a tick from the ticker.
    ///
    /// A stale token leaves the schedule alone: the tick that belongs to the
    /// current run is already pending.
    pub fn on_tick(&mut self, token: TickToken) -> Option<Event> {
        if token != self.engine.tick_token() {
            return None;
        }
        let event = self.engine.tick(token, &mut self.counters);
        if self.engine.state() == TimerState::Running {
            self.ticker.schedule(self.engine.tick_token());
        }
        event
    }

    /// Tear the session down, handing back the counters.
    pub fn into_counters(mut self) -> FocusCounters {
        self.ticker.cancel();
        self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTicker;

    fn controller(secs: u32) -> FocusController<ManualTicker> {
        FocusController::new(
            TimerEngine::new(secs).unwrap(),
            FocusCounters::default(),
            ManualTicker::new(),
        )
    }

    fn drain(ctl: &mut FocusController<ManualTicker>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(token) = ctl.ticker_mut().fire() {
            events.extend(ctl.on_tick(token));
        }
        events
    }

    #[test]
    fn start_schedules_first_tick() {
        let mut ctl = controller(3);
        ctl.start();
        assert!(ctl.ticker().pending().is_some());
    }

    #[test]
    fn runs_to_completion_and_stops_scheduling() {
        let mut ctl = controller(3);
        ctl.start();
        let events = drain(&mut ctl);

        assert_eq!(events.len(), 1);
        assert_eq!(ctl.state(), TimerState::Stopped);
        assert!(ctl.ticker().pending().is_none());
        assert_eq!(ctl.ticker().scheduled(), 3);
        assert_eq!(ctl.counters().completed_sessions(), 1);
    }

    #[test]
    fn pause_withdraws_pending_tick() {
        let mut ctl = controller(5);
        ctl.start();
        ctl.pause();
        assert!(ctl.ticker().pending().is_none());

        ctl.resume();
        assert!(ctl.ticker().pending().is_some());
    }

    #[test]
    fn reset_from_running_cancels_schedule() {
        let mut ctl = controller(5);
        ctl.start();
        let token = ctl.ticker_mut().fire().unwrap();
        ctl.on_tick(token);

        ctl.reset();
        assert!(ctl.ticker().pending().is_none());
        assert_eq!(ctl.engine().remaining_secs(), 5);
        assert_eq!(ctl.state(), TimerState::Stopped);
    }

    #[test]
    fn late_tick_after_reset_is_ignored() {
        let mut ctl = controller(5);
        ctl.start();
        let stale = ctl.ticker().pending().unwrap();
        ctl.reset();
        ctl.start();

        assert!(ctl.on_tick(stale).is_none());
        assert_eq!(ctl.engine().remaining_secs(), 5);
    }
}
