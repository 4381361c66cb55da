//! Completion markers: proof that a task finished in an earlier run.
//!
//! The scheduler never looks at marker contents, only at whether the marker
//! is present. [`FileMarker`] is the on-disk form used by batch packs;
//! [`MemoryMarkers`] is a process-local store for embedding and tests.

use chrono::{Local, SecondsFormat};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Idempotency record for one task.
pub trait Marker {
    /// True if the task already completed.
    fn is_marked(&self) -> io::Result<bool>;

    /// Record completion.
    fn mark(&self) -> io::Result<()>;

    /// Human-readable location, for diagnostics.
    fn describe(&self) -> String;
}

/// Marker file whose existence means "done". Content is `Did: <timestamp>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMarker {
    path: PathBuf,
}

impl FileMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Marker for FileMarker {
    fn is_marked(&self) -> io::Result<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn mark(&self) -> io::Result<()> {
        let stamp = Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
        fs::write(&self.path, format!("Did: {}\n", stamp))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Shared in-memory set of completed keys. Clones see the same set.
#[derive(Debug, Clone, Default)]
pub struct MemoryMarkers {
    done: Rc<RefCell<HashSet<String>>>,
}

impl MemoryMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker for `key` backed by this store.
    pub fn marker(&self, key: impl Into<String>) -> MemoryMarker {
        MemoryMarker {
            store: self.clone(),
            key: key.into(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.done.borrow().contains(key)
    }

    pub fn insert(&self, key: impl Into<String>) {
        self.done.borrow_mut().insert(key.into());
    }
}

/// One key in a [`MemoryMarkers`] store.
#[derive(Debug, Clone)]
pub struct MemoryMarker {
    store: MemoryMarkers,
    key: String,
}

impl Marker for MemoryMarker {
    fn is_marked(&self) -> io::Result<bool> {
        Ok(self.store.contains(&self.key))
    }

    fn mark(&self) -> io::Result<()> {
        self.store.insert(self.key.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_marker_absent_then_marked() {
        let dir = tempdir().unwrap();
        let marker = FileMarker::new(dir.path().join("a.did.txt"));
        assert!(!marker.is_marked().unwrap());
        marker.mark().unwrap();
        assert!(marker.is_marked().unwrap());
        let text = fs::read_to_string(marker.path()).unwrap();
        assert!(text.starts_with("Did: "));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn directory_is_not_a_marker() {
        let dir = tempdir().unwrap();
        let marker = FileMarker::new(dir.path());
        assert!(!marker.is_marked().unwrap());
    }

    #[test]
    fn memory_markers_share_state_across_clones() {
        let store = MemoryMarkers::new();
        let marker = store.marker("job-1");
        assert!(!marker.is_marked().unwrap());
        marker.mark().unwrap();
        assert!(store.clone().contains("job-1"));
        assert!(store.marker("job-1").is_marked().unwrap());
        assert!(!store.marker("job-2").is_marked().unwrap());
    }
}
