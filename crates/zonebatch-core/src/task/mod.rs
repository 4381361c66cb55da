//! Units of work that run as external processes.
//!
//! A [`Task`] only knows what to run and how to read the result. The lifecycle
//! (INIT → WAIT → BUSY → DONE), completion markers and log artifacts live in
//! [`Scheduled`], which the scheduler drives.

mod command;
mod error;
mod marker;
mod process;
mod scheduled;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;

pub use command::CommandTask;
pub use error::{OutcomeError, TaskError};
pub use marker::{FileMarker, Marker, MemoryMarker, MemoryMarkers};
pub use process::{Launcher, ProcessLauncher, Running};
pub use scheduled::{present_command, Scheduled};

/// Lifecycle level of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskLevel {
    /// Not polled yet.
    Init,
    /// Eligible for launch.
    Wait,
    /// External process running.
    Busy,
    /// Finished (or already done by a previous run).
    Done,
}

impl TaskLevel {
    pub const ALL: [TaskLevel; 4] = [
        TaskLevel::Init,
        TaskLevel::Wait,
        TaskLevel::Busy,
        TaskLevel::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskLevel::Init => "INIT",
            TaskLevel::Wait => "WAIT",
            TaskLevel::Busy => "BUSY",
            TaskLevel::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Raw standard output.
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
}

impl Exit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// One schedulable external-process invocation.
pub trait Task {
    /// Program followed by its arguments. Queried once, at launch.
    fn command(&self) -> Vec<String>;

    /// Whether the finished process counts as a success. Default: exit code 0.
    fn verdict(&self, exit: &Exit) -> bool {
        exit.success()
    }

    /// Extract task-specific results. Only called after a successful verdict,
    /// and before the completion marker is written.
    fn outcome(&mut self, _exit: &Exit) -> Result<(), OutcomeError> {
        Ok(())
    }
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn command(&self) -> Vec<String> {
        (**self).command()
    }

    fn verdict(&self, exit: &Exit) -> bool {
        (**self).verdict(exit)
    }

    fn outcome(&mut self, exit: &Exit) -> Result<(), OutcomeError> {
        (**self).outcome(exit)
    }
}

impl<T: Task + ?Sized> Task for &mut T {
    fn command(&self) -> Vec<String> {
        (**self).command()
    }

    fn verdict(&self, exit: &Exit) -> bool {
        (**self).verdict(exit)
    }

    fn outcome(&mut self, exit: &Exit) -> Result<(), OutcomeError> {
        (**self).outcome(exit)
    }
}
