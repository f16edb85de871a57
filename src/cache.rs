// src/cache.rs

//! Atomic file cache with TTL-gated reuse
//!
//! Cache slots are directories keyed by a deterministic string (for index
//! documents, a hash of the source URL) holding a single named file. A slot
//! is reused as long as the file's age is within the caller's TTL; otherwise
//! the caller's fetch callback repopulates it. Population happens against a
//! temp file in the slot directory followed by an atomic rename, under an
//! exclusive advisory lock, so concurrent processes never observe a torn
//! file and at most one fetch wins per slot at a time.

use crate::error::{Error, Result};
use fs2::FileExt;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Lock file name within a cache slot
const LOCK_FILENAME: &str = ".lock";

/// Derive a cache key from a URL
///
/// SHA-256 over the URL bytes, hex-encoded. Distinct URLs never collide on
/// disk; the same URL always lands in the same slot.
pub fn key_for_url(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Return the cached file for `key`, repopulating it first if stale
///
/// The file `cache_dir/<key>/<filename>` is returned as-is when its
/// modification time is younger than `ttl`. Otherwise `fetch` is invoked
/// with a temp path to write the new content, which is then atomically
/// renamed into place. `key` may contain `/` separators to nest slots.
///
/// Freshness is re-checked after acquiring the slot lock: a concurrent
/// caller may have repopulated the slot while we waited, in which case the
/// fetch is skipped entirely.
pub fn atomic_file<F>(
    cache_dir: &Path,
    key: &str,
    filename: &str,
    ttl: Duration,
    fetch: F,
) -> Result<PathBuf>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let slot = key
        .split('/')
        .fold(cache_dir.to_path_buf(), |dir, part| dir.join(part));
    let target = slot.join(filename);

    if is_fresh(&target, ttl) {
        debug!("Cache hit for {}", target.display());
        return Ok(target);
    }

    fs::create_dir_all(&slot).map_err(|e| {
        Error::IoError(format!("Failed to create cache slot {}: {e}", slot.display()))
    })?;

    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(slot.join(LOCK_FILENAME))
        .map_err(|e| Error::IoError(format!("Failed to open cache lock: {e}")))?;
    lock_file
        .lock_exclusive()
        .map_err(|e| Error::IoError(format!("Failed to lock cache slot: {e}")))?;

    let result = populate_locked(&slot, &target, filename, ttl, fetch);

    let _ = lock_file.unlock();
    result
}

fn populate_locked<F>(
    slot: &Path,
    target: &Path,
    filename: &str,
    ttl: Duration,
    fetch: F,
) -> Result<PathBuf>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if is_fresh(target, ttl) {
        debug!("Cache slot repopulated concurrently, reusing {}", target.display());
        return Ok(target.to_path_buf());
    }

    let tmp = tempfile::Builder::new()
        .prefix(filename)
        .suffix(".tmp")
        .tempfile_in(slot)
        .map_err(|e| Error::IoError(format!("Failed to create temp file: {e}")))?;

    fetch(tmp.path())?;

    tmp.persist(target).map_err(|e| {
        Error::IoError(format!("Failed to move temp file to {}: {}", target.display(), e.error))
    })?;

    debug!("Cache slot populated at {}", target.display());
    Ok(target.to_path_buf())
}

/// Whether the file at `path` exists and is younger than `ttl`
///
/// A modification time in the future counts as age zero. A zero TTL is
/// never fresh, so every call refetches.
fn is_fresh(path: &Path, ttl: Duration) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(mtime) = metadata.modified() else {
        return false;
    };
    let age = SystemTime::now()
        .duration_since(mtime)
        .unwrap_or(Duration::ZERO);
    age < ttl
}
