//! Tick sources.
//!
//! The engine never waits on a clock itself. It asks a [`Ticker`] to call
//! back once after one interval, and the request can be withdrawn at any
//! time. [`TokioTicker`] is the production source; [`ManualTicker`] lets
//! tests fire ticks synchronously.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use super::engine::TickToken;

/// One-shot, cancellable "notify me after one interval" port.
pub trait Ticker {
    /// Request a single notification carrying `token`.
    /// Replaces any request still pending.
    fn schedule(&mut self, token: TickToken);

    /// Withdraw the pending request, if any.
    fn cancel(&mut self);
}

/// Test double: holds the pending token until the test fires it.
#[derive(Debug, Default)]
pub struct ManualTicker {
    pending: Option<TickToken>,
    scheduled: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending token, as if its interval had elapsed.
    pub fn fire(&mut self) -> Option<TickToken> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<TickToken> {
        self.pending
    }

    /// Number of schedule requests seen so far.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }
}

impl Ticker for ManualTicker {
    fn schedule(&mut self, token: TickToken) {
        self.scheduled += 1;
        self.pending = Some(token);
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Receiving end of a [`TokioTicker`].
pub type TickReceiver = mpsc::UnboundedReceiver<TickToken>;

/// Tick source backed by `tokio::time::sleep`.
///
/// Each request spawns one sleeping task that sends its token when it
/// wakes. Cancelling aborts the task, so a withdrawn tick is never
/// delivered. Dropping the ticker cancels too.
#[derive(Debug)]
pub struct TokioTicker {
    interval: Duration,
    tx: mpsc::UnboundedSender<TickToken>,
    pending: Option<JoinHandle<()>>,
}

impl TokioTicker {
    /// Must be called from within a tokio runtime.
    pub fn new(interval: Duration) -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                interval,
                tx,
                pending: None,
            },
            rx,
        )
    }

    /// One tick per second.
    pub fn per_second() -> (Self, TickReceiver) {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker for TokioTicker {
    fn schedule(&mut self, token: TickToken) {
        self.cancel();
        let tx = self.tx.clone();
        let interval = self.interval;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            // The receiver may be gone if the screen was torn down.
            let _ = tx.send(token);
        }));
        trace!(?token, "tick scheduled");
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            trace!("pending tick cancelled");
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerEngine;

    #[test]
    fn manual_ticker_replaces_and_cancels() {
        let engine = TimerEngine::new(10).unwrap();
        let mut ticker = ManualTicker::new();
        ticker.schedule(engine.tick_token());
        ticker.schedule(engine.tick_token());
        assert_eq!(ticker.scheduled(), 2);
        assert!(ticker.pending().is_some());

        ticker.cancel();
        assert!(ticker.fire().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_delivers_after_interval() {
        let engine = TimerEngine::new(10).unwrap();
        let (mut ticker, mut rx) = TokioTicker::per_second();
        ticker.schedule(engine.tick_token());

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(rx.try_recv().is_err());

        let token = rx.recv().await;
        assert_eq!(token, Some(engine.tick_token()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_tick_is_never_delivered() {
        let engine = TimerEngine::new(10).unwrap();
        let (mut ticker, mut rx) = TokioTicker::per_second();
        ticker.schedule(engine.tick_token());
        ticker.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_ticker_stops_schedule() {
        let engine = TimerEngine::new(10).unwrap();
        let (mut ticker, mut rx) = TokioTicker::per_second();
        ticker.schedule(engine.tick_token());
        drop(ticker);

        // Sender is gone and the sleeping task was aborted.
        assert_eq!(rx.recv().await, None);
    }
}
