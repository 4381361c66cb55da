//! `zonebatch scan` – expand scan formats into a new batch pack.

use anyhow::Result;
use std::path::Path;
use zonebatch_core::pack::{self, PackError, ScanKey, ScanNames};

pub fn run_scan(
    keys: &[ScanKey],
    formats: &[String],
    part_size: usize,
    pack_path: &Path,
) -> Result<()> {
    let names = ScanNames::new(formats, keys);
    let summary = pack::write_pack(pack_path, part_size, names)?;
    tracing::info!(
        parts = summary.part_total,
        names = summary.name_total,
        pack = %pack_path.display(),
        "scan pack written"
    );
    println!(
        "Done: {} name(s) in {} part(s)",
        summary.name_total, summary.part_total
    );
    Ok(())
}

/// `--scan-key-value "N 0 1 2"`: the key, then its values, separated by whitespace.
pub(crate) fn parse_scan_key(arg: &str) -> Result<ScanKey, PackError> {
    let words: Vec<String> = arg.split_whitespace().map(String::from).collect();
    ScanKey::from_words(&words)
}
