//! Exclusive advisory lock on the shared lock file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use super::error::RateError;

/// Non-blocking exclusive lock shared by cooperating processes.
pub trait AdvisoryLock {
    /// One attempt. `Ok(false)` means another holder has it.
    fn try_acquire(&mut self) -> Result<bool, RateError>;
    fn release(&mut self) -> Result<(), RateError>;
}

/// Create the lock file if missing. Losing the creation race is fine.
pub fn bootstrap(path: &Path) -> Result<(), RateError> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            tracing::debug!("created lock file {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(RateError::Bootstrap {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `flock(2)` on a descriptor kept open for the lifetime of the value.
/// The lock is released on drop if still held.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    file: File,
    held: bool,
}

impl FileLock {
    pub fn open(path: &Path) -> Result<Self, RateError> {
        bootstrap(path)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| RateError::Lock {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            held: false,
        })
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl AdvisoryLock for FileLock {
    fn try_acquire(&mut self) -> Result<bool, RateError> {
        if self.held {
            return Ok(true);
        }
        match lock_exclusive(&self.file) {
            Ok(()) => {
                self.held = true;
                Ok(true)
            }
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted =>
            {
                Ok(false)
            }
            Err(source) => Err(RateError::Lock {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn release(&mut self) -> Result<(), RateError> {
        if !self.held {
            return Ok(());
        }
        unlock(&self.file).map_err(|source| RateError::Unlock {
            path: self.path.clone(),
            source,
        })?;
        self.held = false;
        Ok(())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if self.held {
            let _ = unlock(&self.file);
        }
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if ret == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(unix)]
fn unlock(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
    if ret == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "advisory file locks are only supported on unix",
    ))
}

#[cfg(not(unix))]
fn unlock(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_creates_once_and_tolerates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lock.txt");
        bootstrap(&path).unwrap();
        std::fs::write(&path, "kept\n").unwrap();
        bootstrap(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept\n");
    }

    #[test]
    fn bootstrap_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("lock.txt");
        let err = bootstrap(&path).unwrap_err();
        assert!(matches!(err, RateError::Bootstrap { .. }));
    }

    #[test]
    fn second_holder_is_refused_until_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lock.txt");
        let mut first = FileLock::open(&path).unwrap();
        let mut second = FileLock::open(&path).unwrap();

        assert!(first.try_acquire().unwrap());
        assert!(first.try_acquire().unwrap());
        assert!(!second.try_acquire().unwrap());

        first.release().unwrap();
        assert!(!first.is_held());
        assert!(second.try_acquire().unwrap());
        second.release().unwrap();
    }

    #[test]
    fn drop_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lock.txt");
        {
            let mut first = FileLock::open(&path).unwrap();
            assert!(first.try_acquire().unwrap());
        }
        let mut second = FileLock::open(&path).unwrap();
        assert!(second.try_acquire().unwrap());
    }
}
