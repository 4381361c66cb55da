//! `zonebatch lookup` – the rate-limited RDAP worker for one FQDN file.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use zonebatch_core::config::ZonebatchConfig;
use zonebatch_core::rdap::{Fqdn, RdapLookup, ReportWriter};

pub fn run_lookup(
    cfg: &ZonebatchConfig,
    fqdn_path_file: &Path,
    report_path_file: &Path,
    lock_path_file: &Path,
) -> Result<()> {
    let fqdns = read_fqdn_file(fqdn_path_file)?;
    let report = File::create(report_path_file)
        .with_context(|| format!("create report: {}", report_path_file.display()))?;
    let mut lookup = RdapLookup::open(
        lock_path_file,
        cfg,
        ReportWriter::new(BufWriter::new(report)),
    )?;

    for fqdn in &fqdns {
        lookup
            .request(fqdn)
            .with_context(|| format!("lookup {}", fqdn))?;
    }
    tracing::info!(
        count = fqdns.len(),
        report = %report_path_file.display(),
        "lookup finished"
    );
    Ok(())
}

/// Names of an FQDN file; blank lines are skipped, anything else must be `<sld>.<tld>`.
pub(crate) fn read_fqdn_file(path: &Path) -> Result<Vec<Fqdn>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read FQDN file: {}", path.display()))?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.parse::<Fqdn>()
                .with_context(|| format!("{}:{}", path.display(), index + 1))
        })
        .collect()
}
