//! Detecting which output files a run actually changed
//!
//! The output directory is hashed before a run and compared afterwards, so
//! the user sees which fragments the game will pick up differently. Hashing
//! problems are reported and skipped, never fatal.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Hex SHA-256 digest of a file's contents
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(hex::encode(hasher.finalize()))
}

/// Snapshot of output-file digests taken before a run
#[derive(Debug)]
pub struct ChangeTracker {
    root: PathBuf,
    checksums: BTreeMap<PathBuf, String>,
}

impl ChangeTracker {
    /// Hash every file currently under `root`
    ///
    /// A missing root is an empty snapshot; every file is then "changed"
    /// once it appears.
    pub fn scan(root: &Path) -> Self {
        let mut checksums = BTreeMap::new();
        for (path, rel) in files_under(root) {
            match sha256_file(&path) {
                Ok(digest) => {
                    checksums.insert(rel, digest);
                }
                Err(e) => log::warn!("error hashing {}: {}", path.display(), e),
            }
        }
        Self {
            root: root.to_path_buf(),
            checksums,
        }
    }

    /// Files under the root whose contents differ from the snapshot
    pub fn changed_files(&self) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for (path, rel) in files_under(&self.root) {
            match sha256_file(&path) {
                Ok(digest) => {
                    if self.checksums.get(&rel) != Some(&digest) {
                        changed.push(rel);
                    }
                }
                Err(e) => {
                    log::warn!("error checking for changes in {}: {}", path.display(), e);
                }
            }
        }
        changed.sort();
        changed
    }
}

/// All files under `root` with their root-relative paths
fn files_under(root: &Path) -> Vec<(PathBuf, PathBuf)> {
    if !root.exists() {
        return Vec::new();
    }

    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .unwrap_or(e.path())
                .to_path_buf();
            (e.path().to_path_buf(), rel)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sha256_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.inc");
        fs::write(&path, b"abc").unwrap();
        assert_eq!(
            sha256_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_unchanged_files_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.inc"), b"same").unwrap();

        let tracker = ChangeTracker::scan(dir.path());
        assert!(tracker.changed_files().is_empty());
    }

    #[test]
    fn test_modified_and_new_files_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.inc"), b"old").unwrap();

        let tracker = ChangeTracker::scan(dir.path());
        fs::write(dir.path().join("a.inc"), b"new").unwrap();
        fs::write(dir.path().join("b.inc"), b"fresh").unwrap();

        let changed = tracker.changed_files();
        assert_eq!(changed, vec![PathBuf::from("a.inc"), PathBuf::from("b.inc")]);
    }

    #[test]
    fn test_missing_root_is_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = ChangeTracker::scan(&dir.path().join("missing"));
        assert!(tracker.changed_files().is_empty());
    }
}
