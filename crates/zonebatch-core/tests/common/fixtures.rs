//! Shell-backed tasks and throwaway scripts for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use zonebatch_core::scheduler::ManagerSettings;
use zonebatch_core::task::{CommandTask, FileMarker, Scheduled};

/// `sh -c <script>`.
pub fn sh(script: &str) -> CommandTask {
    CommandTask::new(["sh", "-c", script])
}

/// Task `index` of a batch in `dir`, with `<index>.log.txt` and marker `<index>.did.txt`.
pub fn batch_task(dir: &Path, index: usize, script: &str) -> Scheduled<CommandTask> {
    Scheduled::new(sh(script))
        .with_log(log_path(dir, index))
        .with_marker(FileMarker::new(marker_path(dir, index)))
}

pub fn log_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{index:06}.log.txt"))
}

pub fn marker_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{index:06}.did.txt"))
}

/// Fast polling, no progress reports.
pub fn quick_settings(core_total: usize) -> ManagerSettings {
    ManagerSettings {
        label: Some("integration".to_string()),
        core_total,
        idle: Duration::from_millis(10),
        track: None,
    }
}

/// Write a script run as `sh <path>`, so no exec bit is needed.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}
