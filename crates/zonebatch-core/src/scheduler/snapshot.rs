//! Frozen per-level task counts.

use chrono::{DateTime, Local};

use crate::task::TaskLevel;

/// Count of tasks per lifecycle level at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    init: usize,
    wait: usize,
    busy: usize,
    done: usize,
    taken_at: DateTime<Local>,
}

impl Snapshot {
    /// Count `levels` now.
    pub fn capture<I>(levels: I) -> Self
    where
        I: IntoIterator<Item = TaskLevel>,
    {
        Self::at(levels, Local::now())
    }

    /// Count `levels` with an explicit capture time.
    pub fn at<I>(levels: I, taken_at: DateTime<Local>) -> Self
    where
        I: IntoIterator<Item = TaskLevel>,
    {
        let mut snapshot = Snapshot {
            init: 0,
            wait: 0,
            busy: 0,
            done: 0,
            taken_at,
        };
        for level in levels {
            match level {
                TaskLevel::Init => snapshot.init += 1,
                TaskLevel::Wait => snapshot.wait += 1,
                TaskLevel::Busy => snapshot.busy += 1,
                TaskLevel::Done => snapshot.done += 1,
            }
        }
        snapshot
    }

    pub fn taken_at(&self) -> DateTime<Local> {
        self.taken_at
    }

    pub fn count(&self, level: TaskLevel) -> usize {
        match level {
            TaskLevel::Init => self.init,
            TaskLevel::Wait => self.wait,
            TaskLevel::Busy => self.busy,
            TaskLevel::Done => self.done,
        }
    }

    pub fn wait_total(&self) -> usize {
        self.wait
    }

    pub fn busy_total(&self) -> usize {
        self.busy
    }

    /// Tasks not yet DONE.
    pub fn left_total(&self) -> usize {
        self.init + self.wait + self.busy
    }

    pub fn done_total(&self) -> usize {
        self.done
    }

    pub fn full_total(&self) -> usize {
        self.left_total() + self.done
    }

    /// Whole percent complete: `100 - floor(left * 100 / full)`. An empty batch is 100%.
    pub fn percent(&self) -> usize {
        let full = self.full_total();
        if full == 0 {
            return 100;
        }
        100 - self.left_total() * 100 / full
    }
}
