//! Refresh orchestration: the cycle runner, its published state, and the
//! timer that drives it.

pub mod runner;
pub mod scheduler;

pub use runner::{status_channel, CycleRunner, DisplaySettings, StatusReceiver};
pub use scheduler::RefreshScheduler;
