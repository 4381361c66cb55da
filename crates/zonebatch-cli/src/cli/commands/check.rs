//! `zonebatch check` – one `lookup` worker per FQDN file in a pack directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use zonebatch_core::config::ZonebatchConfig;
use zonebatch_core::pack::FQDN_SUFFIX;
use zonebatch_core::rate_limit;
use zonebatch_core::scheduler::TaskManager;
use zonebatch_core::task::{CommandTask, FileMarker, Scheduled};

use super::{print_progress, settings_for};

const LOCK_FILE_NAME: &str = "lock.txt";

pub fn run_check(
    cfg: &ZonebatchConfig,
    config_path: Option<&Path>,
    pack_path: &Path,
    core_total: Option<usize>,
) -> Result<()> {
    let file_names = fqdn_files(pack_path)?;
    if file_names.is_empty() {
        println!("No *{} files in {}.", FQDN_SUFFIX, pack_path.display());
        return Ok(());
    }

    let lock_path = pack_path.join(LOCK_FILE_NAME);
    rate_limit::bootstrap(&lock_path)?;
    let exe = std::env::current_exe().context("locate zonebatch executable")?;

    let mut manager = TaskManager::new(settings_for(cfg, "FQDNS", core_total));
    for file_name in &file_names {
        let stem = file_name.trim_end_matches(FQDN_SUFFIX);
        let command = worker_command(&exe, config_path, pack_path, file_name);
        manager.add_task(
            Scheduled::new(CommandTask::new(command))
                .with_log(pack_path.join(format!("{stem}.log.txt")))
                .with_marker(FileMarker::new(pack_path.join(format!("{stem}.did.txt")))),
        );
    }
    manager.on_progress(print_progress);
    manager.execute()?;

    println!("Done: {} FQDN file(s)", file_names.len());
    Ok(())
}

/// `*.fqdn.txt` names in `pack_path`, sorted.
pub(crate) fn fqdn_files(pack_path: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(pack_path)
        .with_context(|| format!("read pack dir: {}", pack_path.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read pack dir: {}", pack_path.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(FQDN_SUFFIX) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Command line of the `lookup` worker for one FQDN file.
pub(crate) fn worker_command(
    exe: &Path,
    config_path: Option<&Path>,
    pack_path: &Path,
    file_name: &str,
) -> Vec<String> {
    let stem = file_name.trim_end_matches(FQDN_SUFFIX);
    let path = |name: &str| pack_path.join(name).display().to_string();
    let mut command = vec![exe.display().to_string()];
    if let Some(config_path) = config_path {
        command.push("--config".to_string());
        command.push(config_path.display().to_string());
    }
    command.extend([
        "lookup".to_string(),
        "--fqdn-path-file".to_string(),
        path(file_name),
        "--report-path-file".to_string(),
        path(&format!("{stem}.report.txt")),
        "--lock-path-file".to_string(),
        path(LOCK_FILE_NAME),
    ]);
    command
}
