//! Sliding-window request log stored as one timestamp per line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone};

use super::error::RateError;

/// Start times of recent requests, oldest first.
pub trait RequestLog {
    fn read(&mut self) -> Result<Vec<DateTime<Local>>, RateError>;
    /// Replace the whole log with `stamps`.
    fn write(&mut self, stamps: &[DateTime<Local>]) -> Result<(), RateError>;
}

/// Request log kept in the lock file itself. Only touch it while holding the lock.
#[derive(Debug, Clone)]
pub struct FileRequestLog {
    path: PathBuf,
}

impl FileRequestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RequestLog for FileRequestLog {
    fn read(&mut self) -> Result<Vec<DateTime<Local>>, RateError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(RateError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        parse_log(&self.path, &text)
    }

    // Rewritten in place: replacing the file would detach it from the held lock.
    fn write(&mut self, stamps: &[DateTime<Local>]) -> Result<(), RateError> {
        let text: String = stamps
            .iter()
            .map(|s| format!("{}\n", format_stamp(s)))
            .collect();
        fs::write(&self.path, text).map_err(|source| RateError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn parse_log(path: &Path, text: &str) -> Result<Vec<DateTime<Local>>, RateError> {
    let mut stamps = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let stamp = parse_stamp(line).ok_or_else(|| RateError::Malformed {
            path: path.to_path_buf(),
            line: index + 1,
            text: line.to_string(),
        })?;
        stamps.push(stamp);
    }
    Ok(stamps)
}

/// RFC 3339, or a naive ISO-8601 date-time read as local time.
pub fn parse_stamp(text: &str) -> Option<DateTime<Local>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Local));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

pub fn format_stamp(stamp: &DateTime<Local>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Keep stamps no older than `window` at `now`.
pub fn prune(
    stamps: Vec<DateTime<Local>>,
    now: DateTime<Local>,
    window: Duration,
) -> Vec<DateTime<Local>> {
    let Some(cutoff) = chrono::Duration::from_std(window)
        .ok()
        .and_then(|w| now.checked_sub_signed(w))
    else {
        return stamps;
    };
    stamps.into_iter().filter(|s| *s >= cutoff).collect()
}
