use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};

/// Source of wall-clock time and the only place the limiter blocks.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
