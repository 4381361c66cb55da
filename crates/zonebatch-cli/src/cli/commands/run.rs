//! `zonebatch run` – run a command file as one bounded batch.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use zonebatch_core::config::ZonebatchConfig;
use zonebatch_core::scheduler::TaskManager;
use zonebatch_core::task::{CommandTask, FileMarker, Scheduled};

use super::{print_progress, settings_for};

pub fn run_batch(
    cfg: &ZonebatchConfig,
    command_file: &Path,
    state_path: &Path,
    core_total: Option<usize>,
    label: Option<&str>,
) -> Result<()> {
    let tasks = read_command_file(command_file)?;
    fs::create_dir_all(state_path)
        .with_context(|| format!("create state dir: {}", state_path.display()))?;

    let settings = settings_for(cfg, label.unwrap_or("Commands"), core_total);
    let mut manager = TaskManager::new(settings);
    let total = tasks.len();
    for (index, task) in tasks.into_iter().enumerate() {
        manager.add_task(
            Scheduled::new(task)
                .with_log(state_path.join(format!("{index:06}.log.txt")))
                .with_marker(FileMarker::new(
                    state_path.join(format!("{index:06}.did.txt")),
                )),
        );
    }
    manager.on_progress(print_progress);
    manager.execute()?;

    println!("Done: {} command(s)", total);
    Ok(())
}

/// One task per non-blank, non-comment line.
pub(crate) fn read_command_file(path: &Path) -> Result<Vec<CommandTask>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read command file: {}", path.display()))?;
    let mut tasks = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let task = CommandTask::parse(line).ok_or_else(|| {
            anyhow!(
                "{}:{}: cannot split command line: {}",
                path.display(),
                index + 1,
                line
            )
        })?;
        tasks.push(task);
    }
    Ok(tasks)
}
