// src/home.rs

//! Java home discovery within an extracted archive tree
//!
//! Archives commonly unpack with one wrapping directory (sometimes two),
//! and macOS bundles put the actual home under `Contents/Home`. Starting
//! from the extraction root, this walks at most two levels of single-child
//! wrapping looking for a directory with `bin/java` (or `bin/java.exe`).

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// How many levels of single-child wrapping to descend through
const MAX_DESCEND: u32 = 2;

/// Find the Java home directory within `path`
///
/// The path may be the Java home itself, a directory wrapping it (up to two
/// levels of single-subdirectory nesting), or a macOS-style bundle whose
/// home is at `Contents/Home` beneath any of those.
pub fn find_java_home(path: &Path) -> Result<PathBuf> {
    find_home_inner(path, MAX_DESCEND)?.ok_or_else(|| {
        Error::JavaHomeNotFound(format!(
            "{} does not look like it contains a JDK or JRE",
            path.display()
        ))
    })
}

fn find_home_inner(path: &Path, budget: u32) -> Result<Option<PathBuf>> {
    if looks_like_java_home(path) {
        return Ok(Some(path.to_path_buf()));
    }
    let bundle_home = path.join("Contents").join("Home");
    if looks_like_java_home(&bundle_home) {
        return Ok(Some(bundle_home));
    }
    if budget > 0 {
        if let Some(subdir) = single_subdir(path)? {
            return find_home_inner(&subdir, budget - 1);
        }
    }
    Ok(None)
}

/// Whether `path` has a `bin` directory with a java executable in it
fn looks_like_java_home(path: &Path) -> bool {
    let bin = path.join("bin");
    if !bin.is_dir() {
        return false;
    }
    bin.join("java").is_file() || bin.join("java.exe").is_file()
}

/// The only subdirectory of `path`, if there is exactly one
fn single_subdir(path: &Path) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(path).map_err(|e| {
        Error::IoError(format!("Failed to read directory {}: {e}", path.display()))
    })?;

    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::IoError(format!("Failed to read directory {}: {e}", path.display()))
        })?;
        if entry.path().is_dir() {
            subdirs.push(entry.path());
        }
    }

    match subdirs.as_slice() {
        [only] => Ok(Some(only.clone())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_home(path: &Path, exe: &str) {
        let bin = path.join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join(exe), b"\x7fELF").unwrap();
    }

    #[test]
    fn test_direct_home() {
        let dir = tempfile::tempdir().unwrap();
        make_home(dir.path(), "java");
        assert_eq!(find_java_home(dir.path()).unwrap(), dir.path());
    }

    #[test]
    fn test_windows_home() {
        let dir = tempfile::tempdir().unwrap();
        make_home(dir.path(), "java.exe");
        assert_eq!(find_java_home(dir.path()).unwrap(), dir.path());
    }

    #[test]
    fn test_single_wrapping_directory() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("jdk-17.0.1");
        make_home(&inner, "java");
        assert_eq!(find_java_home(dir.path()).unwrap(), inner);
    }

    #[test]
    fn test_two_wrapping_directories() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("outer").join("jdk-17.0.1");
        make_home(&inner, "java");
        assert_eq!(find_java_home(dir.path()).unwrap(), inner);
    }

    #[test]
    fn test_three_wrapping_directories_exceed_budget() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("a").join("b").join("jdk-17.0.1");
        make_home(&inner, "java");
        let err = find_java_home(dir.path()).unwrap_err();
        assert!(matches!(err, Error::JavaHomeNotFound(_)));
    }

    #[test]
    fn test_macos_bundle_found_without_recursion() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("Contents").join("Home");
        make_home(&home, "java");
        assert_eq!(find_java_home(dir.path()).unwrap(), home);
    }

    #[test]
    fn test_wrapped_macos_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("jdk-17.jdk").join("Contents").join("Home");
        make_home(&home, "java");
        assert_eq!(find_java_home(dir.path()).unwrap(), home);
    }

    #[test]
    fn test_bin_without_java_is_not_home() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        let err = find_java_home(dir.path()).unwrap_err();
        assert!(matches!(err, Error::JavaHomeNotFound(_)));
    }

    #[test]
    fn test_multiple_subdirs_do_not_descend() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("jdk");
        make_home(&inner, "java");
        fs::create_dir(dir.path().join("docs")).unwrap();
        let err = find_java_home(dir.path()).unwrap_err();
        assert!(matches!(err, Error::JavaHomeNotFound(_)));
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        let err = find_java_home(&gone).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
