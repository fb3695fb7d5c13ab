//! Clock port: where "now" comes from.
//!
//! The scheduler computes delays as `fire_at - clock.now()`, so tests inject
//! a fixed clock to pin the wall-clock side while tokio's paused time drives
//! the timers.

use voxhub_domain::time::{self, Timestamp};

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The process's real local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        time::now()
    }
}

impl<T: Clock> Clock for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
