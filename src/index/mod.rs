// src/index/mod.rs

//! JDK index fetching, caching, and resolution
//!
//! The index is a JSON document shaped `{os: {arch: {"jdk@vendor":
//! {version: url}}}}`, fetched over HTTPS and mirrored into a local cache
//! slot keyed by the index URL. Within the configured TTL repeated
//! resolutions are served from disk without touching the network. URLs in
//! the index typically carry a compound scheme like `tgz+https` or
//! `zip+https` signaling archive format plus transport.

use crate::cache;
use crate::conf::Configuration;
use crate::error::{Error, Result};
use crate::version;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Fixed filename within an index cache slot
pub const INDEX_FILENAME: &str = "jdk-index.json";

/// Versioned prefix for index cache slots, so the on-disk layout can change
/// without colliding with older caches
const INDEX_KEY_PREFIX: &str = "v0/index";

/// Vendor keys in the index carry this prefix
const VENDOR_PREFIX: &str = "jdk@";

/// HTTP timeout for index fetches (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A point-in-time snapshot of the JDK index
///
/// Deserializing validates the full nested shape up front, so a mis-shaped
/// document fails at fetch time rather than at some later lookup. The
/// nesting is os -> arch -> "jdk@vendor" -> version -> download URL.
/// `BTreeMap`s keep keys sorted, which makes the persisted form canonical.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JdkIndex {
    entries: BTreeMap<String, BTreeMap<String, VendorTable>>,
}

type VendorTable = BTreeMap<String, BTreeMap<String, String>>;

impl JdkIndex {
    /// List the available (vendor, version) pairs for a platform
    ///
    /// Vendors are returned without their `jdk@` prefix, sorted by
    /// (vendor, version). An absent os or arch yields an empty list; a
    /// platform missing from the index is expected, not a fault.
    pub fn available_jdks(&self, os: &str, arch: &str) -> Vec<(String, String)> {
        let Some(vendors) = self.entries.get(os).and_then(|archs| archs.get(arch)) else {
            debug!("No index entries for {}-{}", os, arch);
            return Vec::new();
        };

        let mut jdks: Vec<(String, String)> = vendors
            .iter()
            .flat_map(|(vendor, versions)| {
                let vendor = vendor.strip_prefix(VENDOR_PREFIX).unwrap_or(vendor);
                versions
                    .keys()
                    .map(move |version| (vendor.to_string(), version.clone()))
            })
            .collect();
        jdks.sort();
        jdks
    }

    /// Resolve the exact index version matching the configured request
    ///
    /// "No versions for this vendor at all" and "versions exist but none
    /// match the specifier" are reported with distinct messages.
    pub fn resolve_version(&self, conf: &Configuration) -> Result<String> {
        let available = self.available_jdks(&conf.os, &conf.arch);
        let versions: Vec<&str> = available
            .iter()
            .filter(|(vendor, _)| vendor == &conf.vendor)
            .map(|(_, version)| version.as_str())
            .collect();

        if versions.is_empty() {
            return Err(Error::NoMatch(format!(
                "No {} JDK is available for {}-{}",
                conf.vendor, conf.os, conf.arch
            )));
        }

        match version::match_version(&conf.vendor, versions, &conf.version)? {
            Some(matched) => Ok(matched.to_string()),
            None => Err(Error::NoMatch(format!(
                "No JDK matching version '{}' for {}-{}-{}",
                conf.version, conf.os, conf.arch, conf.vendor
            ))),
        }
    }

    /// Resolve the download URL for the configured request
    pub fn url(&self, conf: &Configuration) -> Result<String> {
        let matched = self.resolve_version(conf)?;
        let vendor_key = format!("{VENDOR_PREFIX}{}", conf.vendor);
        self.entries
            .get(&conf.os)
            .and_then(|archs| archs.get(&conf.arch))
            .and_then(|vendors| vendors.get(&vendor_key))
            .and_then(|versions| versions.get(&matched))
            .cloned()
            .ok_or_else(|| {
                Error::NoMatch(format!(
                    "No index entry for {}-{}-{}:{}",
                    conf.os, conf.arch, conf.vendor, matched
                ))
            })
    }
}

/// Get the JDK index, from cache if fresh enough
///
/// On a cache miss or expiry this fetches the index from
/// `conf.index_url`, validates it, and persists it canonically before
/// reading it back. Within the TTL no network request is made.
pub fn jdk_index(conf: &Configuration) -> Result<JdkIndex> {
    let key = index_cache_key(&conf.index_url);
    let path = cache::atomic_file(
        &conf.cache_dir,
        &key,
        INDEX_FILENAME,
        conf.index_ttl,
        |dest| fetch_index(dest, conf),
    )?;
    read_index(&path)
}

/// Cache slot key for a given index URL
///
/// Stable across runs; distinct URLs never share a slot.
pub fn index_cache_key(index_url: &str) -> String {
    format!("{INDEX_KEY_PREFIX}/{}", cache::key_for_url(index_url))
}

/// Fetch callback: download, validate, and canonically persist the index
fn fetch_index(dest: &Path, conf: &Configuration) -> Result<()> {
    if !conf.allow_insecure_index {
        let parsed = Url::parse(&conf.index_url).map_err(|e| {
            Error::ConfigError(format!("Invalid index URL {}: {e}", conf.index_url))
        })?;
        if parsed.scheme() != "https" {
            return Err(Error::ConfigError(
                "Index URL must be an HTTPS URL".to_string(),
            ));
        }
    }

    info!("Fetching JDK index from {}", conf.index_url);

    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| Error::DownloadError(format!("Failed to create HTTP client: {e}")))?;

    let response = client
        .get(&conf.index_url)
        .send()
        .map_err(|e| Error::DownloadError(format!("Failed to fetch {}: {e}", conf.index_url)))?;

    if !response.status().is_success() {
        return Err(Error::DownloadError(format!(
            "HTTP {} from {}",
            response.status(),
            conf.index_url
        )));
    }

    let body = response
        .bytes()
        .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;

    let index = parse_index_body(&body, &conf.index_url)?;
    write_canonical(dest, &index)
}

/// Validate a fetched index body
///
/// The index must be 7-bit clean; that catches unexpected encodings and
/// keeps interpretation of the URLs in it unambiguous.
fn parse_index_body(body: &[u8], source: &str) -> Result<JdkIndex> {
    if !body.is_ascii() {
        return Err(Error::ValidationError(format!(
            "Index unexpectedly contains non-ASCII characters ({source})"
        )));
    }
    serde_json::from_slice(body)
        .map_err(|e| Error::ValidationError(format!("Malformed JDK index from {source}: {e}")))
}

/// Persist the index in canonical form
///
/// Sorted keys (from the `BTreeMap`s), two-space indentation, ASCII-only
/// content, Unix line endings. Refetching an unchanged upstream index
/// produces a byte-identical cache file.
fn write_canonical(dest: &Path, index: &JdkIndex) -> Result<()> {
    let text = serde_json::to_string_pretty(index)
        .map_err(|e| Error::ValidationError(format!("Failed to serialize index: {e}")))?;
    fs::write(dest, text)
        .map_err(|e| Error::IoError(format!("Failed to write index to {}: {e}", dest.display())))
}

/// Read a previously persisted index back
///
/// This must always succeed if the write succeeded; a failure means the
/// cache file was damaged after the fact, which is fatal rather than a
/// trigger for a silent refetch.
fn read_index(path: &Path) -> Result<JdkIndex> {
    let body = fs::read(path).map_err(|e| {
        Error::CacheCorrupted(format!("Failed to read cached index {}: {e}", path.display()))
    })?;
    if !body.is_ascii() {
        return Err(Error::CacheCorrupted(format!(
            "Cached index {} contains non-ASCII characters",
            path.display()
        )));
    }
    serde_json::from_slice(&body).map_err(|e| {
        Error::CacheCorrupted(format!(
            "Cached index {} is not valid JSON: {e}",
            path.display()
        ))
    })
}
