//! Task lifecycle: INIT → WAIT → BUSY → DONE.
//!
//! Transitions happen only through [`Scheduled::update`] (polling) and
//! [`Scheduled::launch`] (WAIT → BUSY). A task whose marker is already present
//! goes straight from INIT to DONE and is never launched, which is what lets a
//! restarted batch skip finished work.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::TaskError;
use super::marker::Marker;
use super::process::{Launcher, Running};
use super::{Exit, Task, TaskLevel};

/// Shell-quoted command line, suitable for replaying by hand.
pub fn present_command(command: &[String]) -> String {
    shlex::try_join(command.iter().map(String::as_str)).unwrap_or_else(|_| command.join(" "))
}

/// A task together with its scheduling state.
pub struct Scheduled<T> {
    task: T,
    level: TaskLevel,
    marker: Option<Box<dyn Marker>>,
    log_path: Option<PathBuf>,
    command: Option<Vec<String>>,
    process: Option<Box<dyn Running>>,
    exit: Option<Exit>,
}

impl<T: Task> Scheduled<T> {
    pub fn new(task: T) -> Self {
        Self {
            task,
            level: TaskLevel::Init,
            marker: None,
            log_path: None,
            command: None,
            process: None,
            exit: None,
        }
    }

    /// Attach a completion marker: checked on the first poll, written on success.
    pub fn with_marker(mut self, marker: impl Marker + 'static) -> Self {
        self.marker = Some(Box::new(marker));
        self
    }

    /// Write a log artifact here when the process finishes.
    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn level(&self) -> TaskLevel {
        self.level
    }

    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn into_task(self) -> T {
        self.task
    }

    /// Command as launched; `None` before launch.
    pub fn command(&self) -> Option<&[String]> {
        self.command.as_deref()
    }

    /// Captured exit; `None` until the process has finished.
    pub fn exit(&self) -> Option<&Exit> {
        self.exit.as_ref()
    }

    /// Advance the state machine by one poll.
    pub fn update(&mut self) -> Result<(), TaskError> {
        match self.level {
            TaskLevel::Init => {
                self.level = if self.already_done()? {
                    TaskLevel::Done
                } else {
                    TaskLevel::Wait
                };
                Ok(())
            }
            TaskLevel::Busy => self.collect(),
            TaskLevel::Wait | TaskLevel::Done => Ok(()),
        }
    }

    /// Start the external process and move to BUSY.
    pub fn launch(&mut self, launcher: &mut dyn Launcher) -> Result<(), TaskError> {
        let command = self.task.command();
        let process = launcher
            .launch(&command)
            .map_err(|source| TaskError::Launch {
                command: present_command(&command),
                source,
            })?;
        self.command = Some(command);
        self.process = Some(process);
        self.level = TaskLevel::Busy;
        Ok(())
    }

    fn already_done(&self) -> Result<bool, TaskError> {
        let Some(marker) = &self.marker else {
            return Ok(false);
        };
        marker.is_marked().map_err(|source| TaskError::Marker {
            marker: marker.describe(),
            source,
        })
    }

    fn collect(&mut self) -> Result<(), TaskError> {
        let command_line = present_command(self.command.as_deref().unwrap_or_default());
        let Some(process) = self.process.as_mut() else {
            return Ok(());
        };
        let exit = process.poll().map_err(|source| TaskError::Collect {
            command: command_line.clone(),
            source,
        })?;
        let Some(exit) = exit else {
            return Ok(());
        };
        self.process = None;
        self.level = TaskLevel::Done;
        let exit = &*self.exit.insert(exit);

        let result = self.task.verdict(exit);
        write_log(self.log_path.as_deref(), &command_line, exit, result)?;
        if !result {
            return Err(TaskError::Failed {
                command: command_line,
                code: exit.code,
                log_path: self.log_path.clone(),
            });
        }

        self.task
            .outcome(exit)
            .map_err(|source| TaskError::Outcome {
                command: command_line,
                source,
            })?;
        if let Some(marker) = &self.marker {
            marker.mark().map_err(|source| TaskError::Marker {
                marker: marker.describe(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Streams are copied byte for byte; a stream without a trailing newline runs into the next header.
fn write_log(
    path: Option<&Path>,
    command_line: &str,
    exit: &Exit,
    result: bool,
) -> Result<(), TaskError> {
    let Some(path) = path else {
        return Ok(());
    };
    let code = exit
        .code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string());
    let header = format!("command:\n{command_line}\ncode:\n{code}\nresult:\n{result}\n");
    let mut out = header.into_bytes();
    out.extend_from_slice(b"stdout:\n");
    out.extend_from_slice(&exit.stdout);
    out.extend_from_slice(b"stderr:\n");
    out.extend_from_slice(&exit.stderr);
    fs::File::create(path)
        .and_then(|mut f| f.write_all(&out))
        .map_err(|source| TaskError::Log {
            path: path.to_path_buf(),
            source,
        })
}
