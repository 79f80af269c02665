//! Ensures only one daybook-server instance runs per user.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

/// Holds the lock until dropped
pub struct LockGuard {
    _file: File,
}

fn default_lock_path() -> Result<PathBuf> {
    let runtime_dir = dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .context("Could not determine runtime directory")?;

    Ok(runtime_dir.join("daybook").join("server.lock"))
}

/// Acquire the per-user server lock.
pub fn acquire_lock() -> Result<LockGuard> {
    acquire_lock_at(&default_lock_path()?)
}

/// Acquire an exclusive lock on `path`, failing if another instance holds it.
/// The holder's pid is written into the file.
pub fn acquire_lock_at(path: &Path) -> Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Opened without truncation so a failed attempt leaves the holder's pid
    let mut file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .context("Failed to open lock file")?;

    if file.try_lock_exclusive().is_err() {
        let holder = fs::read_to_string(path).unwrap_or_default();
        let holder = holder.trim();
        anyhow::bail!(
            "Another daybook-server instance is already running{}.\n\
            If you believe this is an error, remove: {}",
            if holder.is_empty() {
                String::new()
            } else {
                format!(" (pid {holder})")
            },
            path.display()
        );
    }

    file.set_len(0)?;
    write!(file, "{}", std::process::id())?;
    tracing::debug!(path = %path.display(), "acquired server lock");

    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lock_fails_until_first_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("server.lock");

        let guard = acquire_lock_at(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            std::process::id().to_string()
        );

        let err = acquire_lock_at(&path).err().unwrap();
        assert!(err.to_string().contains("already running"));
        assert!(err.to_string().contains(&format!("pid {}", std::process::id())));

        drop(guard);
        assert!(acquire_lock_at(&path).is_ok());
    }
}
