//! Fatal task errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error produced by [`Task::outcome`](super::Task::outcome).
pub type OutcomeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that ends a batch. None of these are retried.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The process could not be started (missing program, empty command, ...).
    #[error("failed to launch: {command}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Checking the process or reading back its output failed.
    #[error("failed to collect process: {command}")]
    Collect {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process finished but the task's verdict was failure.
    #[error(
        "unexpected failure: command: {command} code: {} log: {}",
        code_label(.code),
        log_label(.log_path)
    )]
    Failed {
        command: String,
        code: Option<i32>,
        log_path: Option<PathBuf>,
    },

    /// The process succeeded but its output could not be interpreted.
    #[error("unexpected outcome: {command}")]
    Outcome {
        command: String,
        #[source]
        source: OutcomeError,
    },

    #[error("failed to access completion marker {marker}")]
    Marker {
        marker: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write task log {}", .path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

fn log_label(log_path: &Option<PathBuf>) -> String {
    match log_path {
        Some(path) => path.display().to_string(),
        None => "none".to_string(),
    }
}
