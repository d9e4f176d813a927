//! Single-writer safety: advisory exclusive lock on a `.lock` sidecar.
//!
//! The ring format has no cross-process mutex by design, so nothing stops a
//! second writer from mapping the same file and corrupting the watermark
//! protocol. The writer therefore takes an fs2 exclusive lock next to the
//! log file; readers never lock.
//!
//! Lock file path: `<log file>.lock`. Released on Drop.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub struct LockGuard {
    file: std::fs::File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // fs2 unlock errors on drop are ignored deliberately.
        let _ = self.file.unlock();
    }
}

fn lock_file_path(log_path: &Path) -> PathBuf {
    let mut os = log_path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}

fn open_lock_file(log_path: &Path) -> Result<std::fs::File> {
    let path = lock_file_path(log_path);
    let f = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("open lock file {}", path.display()))?;
    Ok(f)
}

/// Acquire the writer lock. Blocks until acquired.
pub fn acquire_writer_lock(log_path: &Path) -> Result<LockGuard> {
    let file = open_lock_file(log_path)?;
    file.lock_exclusive()
        .with_context(|| format!("lock_exclusive {}", lock_file_path(log_path).display()))?;
    Ok(LockGuard {
        file,
        path: lock_file_path(log_path),
    })
}

/// Try to acquire the writer lock. Err if another writer holds it.
pub fn try_acquire_writer_lock(log_path: &Path) -> Result<LockGuard> {
    let file = open_lock_file(log_path)?;
    file.try_lock_exclusive().with_context(|| {
        format!(
            "try_lock_exclusive failed: {}",
            lock_file_path(log_path).display()
        )
    })?;
    Ok(LockGuard {
        file,
        path: lock_file_path(log_path),
    })
}
