//! CLI for zonebatch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zonebatch_core::config;

use commands::{parse_scan_key, run_batch, run_check, run_lookup, run_scan};
use zonebatch_core::pack::ScanKey;

/// Top-level CLI for zonebatch.
#[derive(Debug, Parser)]
#[command(name = "zonebatch")]
#[command(
    about = "zonebatch: bounded batches of external processes and rate-limited RDAP lookups",
    long_about = None
)]
pub struct Cli {
    /// Configuration file to use instead of ~/.config/zonebatch/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run every line of a command file as one batch; completed lines are skipped on rerun.
    Run {
        /// One shell-quoted command per line; blank lines and `#` comments are ignored.
        #[arg(long, value_name = "FILE")]
        command_file: PathBuf,
        /// Directory for per-task logs and completion markers (created if missing).
        #[arg(long, value_name = "DIR")]
        state_path: PathBuf,
        /// Run up to N commands at once (default from config).
        #[arg(long, value_name = "N")]
        core_total: Option<usize>,
        /// Name logged at batch start and finish.
        #[arg(long)]
        label: Option<String>,
    },

    /// Expand scan formats into a new pack of `NNNNNN.fqdn.txt` parts for `check`.
    Scan {
        /// `"KEY VALUE..."`: every KEY in a format stands for each VALUE in turn. Repeatable.
        #[arg(long, value_name = "KEY VALUES", value_parser = parse_scan_key)]
        scan_key_value: Vec<ScanKey>,
        /// Format to expand, e.g. `theLL.com`; every expansion must be `<sld>.<tld>`. Repeatable.
        #[arg(long, required = true, value_name = "FORMAT")]
        scan_format: Vec<String>,
        /// Names per part (1 or more).
        #[arg(long, value_name = "N")]
        part_size: usize,
        /// Existing, empty directory to write the pack into.
        #[arg(long, value_name = "DIR")]
        pack_path: PathBuf,
    },

    /// Check every `*.fqdn.txt` in a pack directory with rate-limited RDAP workers.
    Check {
        /// Pack directory holding `*.fqdn.txt` files; reports, logs, markers and `lock.txt` go here.
        #[arg(long, value_name = "DIR")]
        pack_path: PathBuf,
        /// Run up to N workers at once (default from config).
        #[arg(long, value_name = "N")]
        core_total: Option<usize>,
    },

    /// Look up every name of one FQDN file and write a report. Launched by `check`.
    Lookup {
        /// One `<sld>.<tld>` per line.
        #[arg(long, value_name = "FILE")]
        fqdn_path_file: PathBuf,
        /// Report to write (replaced if present).
        #[arg(long, value_name = "FILE")]
        report_path_file: PathBuf,
        /// Lock file shared by all workers of one pack.
        #[arg(long, value_name = "FILE")]
        lock_path_file: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                command_file,
                state_path,
                core_total,
                label,
            } => run_batch(
                &cfg,
                &command_file,
                &state_path,
                core_total,
                label.as_deref(),
            )?,
            CliCommand::Scan {
                scan_key_value,
                scan_format,
                part_size,
                pack_path,
            } => run_scan(&scan_key_value, &scan_format, part_size, &pack_path)?,
            CliCommand::Check {
                pack_path,
                core_total,
            } => run_check(&cfg, cli.config.as_deref(), &pack_path, core_total)?,
            CliCommand::Lookup {
                fqdn_path_file,
                report_path_file,
                lock_path_file,
            } => run_lookup(&cfg, &fqdn_path_file, &report_path_file, &lock_path_file)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
