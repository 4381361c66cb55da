//! CLI command handlers, one file per subcommand.

mod check;
mod lookup;
mod run;
mod scan;

pub use check::run_check;
pub use lookup::run_lookup;
pub use run::run_batch;
pub use scan::run_scan;
pub(crate) use scan::parse_scan_key;

#[cfg(test)]
pub(crate) use check::{fqdn_files, worker_command};
#[cfg(test)]
pub(crate) use lookup::read_fqdn_file;
#[cfg(test)]
pub(crate) use run::read_command_file;

use zonebatch_core::scheduler::{Direction, ManagerSettings};

/// Progress lines go to stdout as well as the log.
fn print_progress(direction: &Direction) {
    println!("{}", direction.summary());
}

fn settings_for(
    cfg: &zonebatch_core::config::ZonebatchConfig,
    label: &str,
    core_total: Option<usize>,
) -> ManagerSettings {
    let settings = ManagerSettings::from_config(cfg).with_label(label);
    match core_total {
        Some(n) => settings.with_core_total(n),
        None => settings,
    }
}
