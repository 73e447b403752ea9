mod controller;
mod counters;
mod engine;
mod ticker;

pub use controller::FocusController;
pub use counters::FocusCounters;
pub use engine::{TickToken, TimerEngine, TimerState};
pub use ticker::{ManualTicker, TickReceiver, Ticker, TokioTicker};
