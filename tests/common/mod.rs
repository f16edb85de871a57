// tests/common/mod.rs

//! Shared fixtures and helpers for integration tests.

use jdkindex::{cache, index, Configuration};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Index URL used by the fixtures; never actually contacted.
pub const FIXTURE_INDEX_URL: &str = "https://index.invalid/jdk-index.json";

/// A small but representative index document.
pub const FIXTURE_INDEX: &str = r#"{
  "darwin": {
    "arm64": {
      "jdk@adoptium": {
        "17.0.1": "tgz+https://example.com/adoptium-17.0.1-darwin-arm64.tar.gz"
      }
    }
  },
  "linux": {
    "amd64": {
      "jdk@adoptium": {
        "1.8.0.312": "tgz+https://example.com/adoptium-8u312-linux-x64.tar.gz",
        "11.0.1": "tgz+https://example.com/adoptium-11.0.1-linux-x64.tar.gz",
        "11.0.9": "tgz+https://example.com/adoptium-11.0.9-linux-x64.tar.gz",
        "11.0.10": "tgz+https://example.com/adoptium-11.0.10-linux-x64.tar.gz",
        "17.0.1": "tgz+https://example.com/adoptium-17.0.1-linux-x64.tar.gz"
      },
      "jdk@graalvm-java17": {
        "22.3.0": "tgz+https://example.com/graalvm-22.3.0-linux-amd64.tar.gz"
      }
    }
  }
}"#;

/// Seed the cache slot for `FIXTURE_INDEX_URL` so that `jdk_index` resolves
/// without any network access.
pub fn seed_index_cache(cache_dir: &Path) {
    let key = index::index_cache_key(FIXTURE_INDEX_URL);
    cache::atomic_file(
        cache_dir,
        &key,
        index::INDEX_FILENAME,
        Duration::from_secs(3600),
        |dest| {
            fs::write(dest, FIXTURE_INDEX)
                .map_err(|e| jdkindex::Error::IoError(e.to_string()))
        },
    )
    .unwrap();
}

/// Configuration pointing at the seeded fixture index.
pub fn fixture_configuration(cache_dir: &Path) -> Configuration {
    Configuration {
        os: "linux".to_string(),
        arch: "amd64".to_string(),
        index_url: FIXTURE_INDEX_URL.to_string(),
        index_ttl: Duration::from_secs(3600),
        cache_dir: cache_dir.to_path_buf(),
        ..Configuration::default()
    }
}
