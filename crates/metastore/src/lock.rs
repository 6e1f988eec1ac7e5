//! Per-entry write lock.
//!
//! An exclusive advisory lock on the entry's `.lock` file, held across the
//! read-modify-write of its record and released when the guard drops,
//! including on error paths. Readers never take it.

use crate::error::{Error, IoContext, Result};
use diagnostics::log_debug;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

pub const LOCK_FILE: &str = ".lock";

pub struct EntryLock {
    file: File,
    path: PathBuf,
}

impl EntryLock {
    /// Block until the lock on `entry_dir` is held.
    pub fn acquire<P: AsRef<Path>>(entry_dir: P) -> Result<Self> {
        let path = entry_dir.as_ref().join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .at(&path)?;

        lock_exclusive(&file).map_err(|e| Error::io(&path, e))?;

        let shown = path.display().to_string();
        log_debug!("Acquired entry lock {shown}", shown: shown);
        Ok(Self { file, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for EntryLock {
    fn drop(&mut self) {
        unlock(&self.file);
        let shown = self.path.display().to_string();
        log_debug!("Released entry lock {shown}", shown: shown);
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and open for the call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(unix)]
fn unlock(file: &File) {
    use std::os::unix::io::AsRawFd;
    // SAFETY: as above; closing the file would release the lock anyway.
    unsafe {
        _ = libc::flock(file.as_raw_fd(), libc::LOCK_UN);
    }
}

// Elsewhere only the single-process discipline applies.
#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}
