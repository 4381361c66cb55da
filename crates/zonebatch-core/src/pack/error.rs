use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("scan key is empty")]
    EmptyKey,

    #[error("scan key {0:?} has no values")]
    MissingValues(String),

    #[error("part size must be 1 or more")]
    PartSize,

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("pack directory is not empty: {}", .0.display())]
    NotEmpty(PathBuf),

    #[error("scan produced an invalid name: {0:?}")]
    Name(String),

    #[error("read pack dir: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write pack part: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
