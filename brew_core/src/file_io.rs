//! # File I/O Module
//!
//! Brewery files are JSON with a `.brew` extension.
//!
//! - **Atomic saves**: write to `.brew.tmp`, sync, then rename over the target
//! - **File locking**: a `.brew.lock` file plus an OS lock keep two writers
//!   from registering batches at the same time
//! - **Version validation**: the major schema version must match
//!
//! ## Example
//!
//! ```rust,no_run
//! use brew_core::brewery::Brewery;
//! use brew_core::file_io::{load_brewery, save_brewery, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("cellar.brew");
//! let lock = FileLock::acquire(path, "ana")?;
//!
//! let mut brewery = load_brewery(path).unwrap_or_else(|_| Brewery::new("Cellar"));
//! brewery.touch();
//! save_brewery(&brewery, path)?;
//!
//! drop(lock);
//! # Ok::<(), brew_core::errors::BrewError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::brewery::{Brewery, SCHEMA_VERSION};
use crate::errors::{BrewError, BrewResult};

/// Locks older than this are taken over
const STALE_LOCK_HOURS: i64 = 24;

/// Contents of a `.lock` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub holder: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    fn new(holder: impl Into<String>) -> Self {
        LockInfo {
            holder: holder.into(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    fn is_stale(&self) -> bool {
        Utc::now() - self.locked_at > Duration::hours(STALE_LOCK_HOURS)
    }
}

/// Exclusive lock on a brewery file, released on drop.
pub struct FileLock {
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Take the lock for `holder`.
    ///
    /// Fails with [`BrewError::FileLocked`] when another live holder has it.
    pub fn acquire(path: &Path, holder: impl Into<String>) -> BrewResult<Self> {
        let lock_path = lock_path_for(path);

        if let Some(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(BrewError::file_locked(
                    path.display().to_string(),
                    existing.holder,
                    existing.locked_at.to_rfc3339(),
                ));
            }
            warn!(path = %path.display(), holder = %existing.holder, "taking over stale lock");
        }

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| BrewError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        handle.try_lock_exclusive().map_err(|_| {
            BrewError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let info = LockInfo::new(holder);
        let json = serde_json::to_string_pretty(&info)?;
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.sync_all())
            .map_err(|e| BrewError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), holder = %info.holder, "lock acquired");
        Ok(FileLock {
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current live lock on `path`, if any
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path)).filter(|info| !info.is_stale())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a brewery with write-to-temp-then-rename semantics.
pub fn save_brewery(brewery: &Brewery, path: &Path) -> BrewResult<()> {
    let json = serde_json::to_string_pretty(brewery)?;
    let tmp_path = path.with_extension("brew.tmp");

    let mut tmp = File::create(&tmp_path)
        .map_err(|e| BrewError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.sync_all())
        .map_err(|e| BrewError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BrewError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), batches = brewery.batches.len(), "brewery saved");
    Ok(())
}

/// Load a brewery file and check its schema version.
pub fn load_brewery(path: &Path) -> BrewResult<Brewery> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BrewError::file_error("read", path.display().to_string(), e.to_string()))?;

    let brewery: Brewery = serde_json::from_str(&contents).map_err(|e| BrewError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&brewery.meta.version)?;
    brewery.settings.validate()?;
    Ok(brewery)
}

/// Major versions must match.
fn validate_version(file_version: &str) -> BrewResult<()> {
    let major = |version: &str| version.split('.').next().and_then(|p| p.parse::<u32>().ok());

    match (major(file_version), major(SCHEMA_VERSION)) {
        (Some(file), Some(current)) if file == current => Ok(()),
        _ => Err(BrewError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{Batch, Recipe};
    use uuid::Uuid;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.brew", name, Uuid::new_v4()))
    }

    #[test]
    fn test_lock_path() {
        assert_eq!(lock_path_for(Path::new("cellar.brew")), PathBuf::from("cellar.brew.lock"));
        assert_eq!(lock_path_for(Path::new("cellar")), PathBuf::from("cellar.lock"));
    }

    #[test]
    fn test_validate_version() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.9.3").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save-load");
        let mut brewery = Brewery::new("Roundtrip");
        brewery.register_batch(Batch::new(Uuid::new_v4(), Recipe::new("Saison", 20.0)));

        save_brewery(&brewery, &path).unwrap();
        let loaded = load_brewery(&path).unwrap();
        assert_eq!(loaded.meta.name, "Roundtrip");
        assert_eq!(loaded.batches.len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_brewery(&temp_path("missing")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_lock_blocks_second_holder() {
        let path = temp_path("lock");
        let lock = FileLock::acquire(&path, "ana").unwrap();
        assert_eq!(FileLock::check(&path).map(|i| i.holder), Some("ana".to_string()));

        let err = FileLock::acquire(&path, "ben").err().unwrap();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        drop(lock);
        assert!(FileLock::check(&path).is_none());
    }
}
