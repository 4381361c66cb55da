use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::rdap::Fqdn;

use super::error::PackError;

/// Suffix of the name files a pack is made of.
pub const FQDN_SUFFIX: &str = ".fqdn.txt";

/// `000001.fqdn.txt` for part 1.
pub fn part_file_name(number: usize) -> String {
    format!("{number:06}{FQDN_SUFFIX}")
}

/// Totals of a written pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSummary {
    pub part_total: usize,
    pub name_total: usize,
}

/// Writes names into consecutive parts of at most `part_size` lines.
///
/// Parts are numbered from 1 and created on their first name, so no part is
/// ever empty.
pub struct PackWriter {
    dir: PathBuf,
    part_size: usize,
    summary: PackSummary,
    in_part: usize,
    out: Option<BufWriter<File>>,
}

impl PackWriter {
    /// Start a pack in `dir`, which must exist and be empty.
    pub fn create(dir: &Path, part_size: usize) -> Result<Self, PackError> {
        if part_size == 0 {
            return Err(PackError::PartSize);
        }
        if !dir.is_dir() {
            return Err(PackError::NotADirectory(dir.to_path_buf()));
        }
        let mut entries = fs::read_dir(dir).map_err(|source| PackError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        if entries.next().is_some() {
            return Err(PackError::NotEmpty(dir.to_path_buf()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            part_size,
            summary: PackSummary {
                part_total: 0,
                name_total: 0,
            },
            in_part: 0,
            out: None,
        })
    }

    pub fn push(&mut self, fqdn: &Fqdn) -> Result<(), PackError> {
        let out = match self.out.take() {
            Some(out) if self.in_part < self.part_size => out,
            full => {
                if let Some(full) = full {
                    self.close(full)?;
                }
                self.open_next()?
            }
        };
        let out = self.out.insert(out);
        writeln!(out, "{fqdn}").map_err(|source| PackError::Write {
            path: self.dir.join(part_file_name(self.summary.part_total)),
            source,
        })?;
        self.in_part += 1;
        self.summary.name_total += 1;
        Ok(())
    }

    /// Flush the last part.
    pub fn finish(mut self) -> Result<PackSummary, PackError> {
        if let Some(out) = self.out.take() {
            self.close(out)?;
        }
        Ok(self.summary)
    }

    fn open_next(&mut self) -> Result<BufWriter<File>, PackError> {
        self.summary.part_total += 1;
        self.in_part = 0;
        let path = self.dir.join(part_file_name(self.summary.part_total));
        let file = File::create(&path).map_err(|source| PackError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("started pack part {}", path.display());
        Ok(BufWriter::new(file))
    }

    fn close(&self, mut out: BufWriter<File>) -> Result<(), PackError> {
        out.flush().map_err(|source| PackError::Write {
            path: self.dir.join(part_file_name(self.summary.part_total)),
            source,
        })
    }
}

/// Validate every name and write it into a new pack in `dir`.
///
/// The directory check happens before the first name is read. A name that is
/// not `<sld>.<tld>` stops the pack; parts already written stay on disk.
pub fn write_pack<I>(dir: &Path, part_size: usize, names: I) -> Result<PackSummary, PackError>
where
    I: IntoIterator<Item = String>,
{
    let mut writer = PackWriter::create(dir, part_size)?;
    for name in names {
        let fqdn: Fqdn = name.parse().map_err(|_| PackError::Name(name))?;
        writer.push(&fqdn)?;
    }
    writer.finish()
}
