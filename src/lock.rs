//! Advisory file locking for the item snapshot
//!
//! Two `todo` processes may write the same snapshot file. Writers hold an
//! exclusive `flock` (via fs2) on a sibling `<file>.lock` for the whole
//! read-modify-write cycle; the guard unlocks on drop.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// How long a snapshot writer waits for the lock, in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// `items.json` is guarded by `items.json.lock`.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Exclusive lock held until dropped
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block until the lock is free or `timeout_ms` has passed. The lock
    /// file and its directory are created when missing.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if let Some(lock) = Self::try_acquire(path)? {
                return Ok(lock);
            }
            if Instant::now() >= deadline {
                return Err(Error::LockFailed(path.to_path_buf()));
            }
            thread::sleep(RETRY_INTERVAL);
        }
    }

    /// Single attempt; `Ok(None)` while someone else holds the lock.
    pub fn try_acquire(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(FileLock {
                file,
                path: path.to_path_buf(),
            })),
            Err(err) if held_elsewhere(&err) => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn held_elsewhere(err: &io::Error) -> bool {
    // fs2 reports Windows sharing violations (32, 33) as raw OS errors.
    err.kind() == io::ErrorKind::WouldBlock
        || (cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33)))
}
