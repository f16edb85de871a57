// src/conf.rs

//! Resolution configuration
//!
//! Plain options struct consumed by the index and resolver code. Fields are
//! public; defaults are detected from the running platform. OS and
//! architecture names are canonicalized to the aliases the index uses
//! (`darwin`/`windows`/..., `amd64`/`arm64`/...), so callers may pass
//! whatever their environment reports.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default index: the coursier jvm-index, a community-maintained catalog of
/// JDK builds keyed by os/arch/vendor/version.
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/coursier/jvm-index/master/index.json";

/// Default vendor when none is requested
pub const DEFAULT_VENDOR: &str = "adoptium";

/// Default index time-to-live (one day)
pub const DEFAULT_INDEX_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for a JDK resolution
///
/// `version` is a specifier, not an exact version: `"17"` means the newest
/// 17.x build, `"11.0+"` means 11.0 or any newer 11.x, and the empty string
/// means the newest build of any version.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Target operating system (canonical index name, e.g. "linux", "darwin")
    pub os: String,
    /// Target architecture (canonical index name, e.g. "amd64", "arm64")
    pub arch: String,
    /// JDK vendor, e.g. "adoptium", "zulu", "graalvm-java17"
    pub vendor: String,
    /// Requested version specifier (possibly open-ended, possibly empty)
    pub version: String,
    /// URL of the JDK index document; must be HTTPS
    pub index_url: String,
    /// Maximum age of the cached index before it is refetched
    pub index_ttl: Duration,
    /// Root directory for cached index files
    pub cache_dir: PathBuf,
    /// Permit a non-HTTPS index URL. Testing only.
    pub allow_insecure_index: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            os: canonical_os(env::consts::OS),
            arch: canonical_arch(env::consts::ARCH),
            vendor: DEFAULT_VENDOR.to_string(),
            version: String::new(),
            index_url: DEFAULT_INDEX_URL.to_string(),
            index_ttl: DEFAULT_INDEX_TTL,
            cache_dir: default_cache_dir(),
            allow_insecure_index: false,
        }
    }
}

/// Map an OS name to the alias used by the index
///
/// The index uses "darwin" for macOS; everything else is lowercased as-is.
pub fn canonical_os(os: &str) -> String {
    let os = os.to_lowercase();
    match os.as_str() {
        "macos" | "darwin" => "darwin".to_string(),
        "win32" => "windows".to_string(),
        _ => os,
    }
}

/// Map an architecture name to the alias used by the index
///
/// The index uses "amd64"/"arm64"/"x86"; Rust and uname report
/// "x86_64"/"aarch64"/"i686" style names.
pub fn canonical_arch(arch: &str) -> String {
    let arch = arch.to_lowercase();
    match arch.as_str() {
        "x86_64" | "x64" => "amd64".to_string(),
        "aarch64" => "arm64".to_string(),
        "i386" | "i486" | "i586" | "i686" | "x86_32" => "x86".to_string(),
        _ => arch,
    }
}

/// Platform cache directory for this crate
///
/// Falls back to `.jdkindex-cache` in the current directory if the platform
/// reports no cache location (containers with no HOME, typically).
pub fn default_cache_dir() -> PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join("jdkindex"),
        None => PathBuf::from(".jdkindex-cache"),
    }
}
