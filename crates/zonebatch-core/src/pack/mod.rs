//! Batch packs: a directory of numbered `*.fqdn.txt` parts.
//!
//! A pack is produced by expanding scan formats into names and splitting them
//! into fixed-size parts. `check` then runs one lookup worker per part.

mod error;
mod scan;
mod writer;

pub use error::PackError;
pub use scan::{expand_format, ScanKey, ScanNames};
pub use writer::{part_file_name, write_pack, PackSummary, PackWriter, FQDN_SUFFIX};
