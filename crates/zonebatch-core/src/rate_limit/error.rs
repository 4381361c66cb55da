use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the shared lock file. Contention and a full window are not
/// errors; the limiter waits those out.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("create lock file: {}", .path.display())]
    Bootstrap {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lock: {}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unlock: {}", .path.display())]
    Unlock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read request log: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write request log: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed timestamp at {}:{line}: {text:?}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        text: String,
    },
}
