//! Loading fragments from pak archives and plain files
//!
//! The game and its mods ship properties fragments inside `.pak` files,
//! which are ordinary zip archives.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Extract a named entry from a pak archive
pub fn load_from_archive(archive_path: &Path, entry: &Path) -> Result<Vec<u8>> {
    log::debug!(
        "loading '{}' from archive '{}'",
        entry.display(),
        archive_path.display()
    );

    let file = File::open(archive_path).map_err(|e| Error::FileRead {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| Error::Archive {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let name = entry.to_string_lossy();
    let mut compressed = match archive.by_name(&name) {
        Ok(f) => f,
        Err(ZipError::FileNotFound) => {
            return Err(Error::EntryNotFound {
                archive: archive_path.to_path_buf(),
                entry: entry.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(Error::Archive {
                path: archive_path.to_path_buf(),
                source: e,
            })
        }
    };

    let mut data = Vec::with_capacity(compressed.size() as usize);
    compressed.read_to_end(&mut data).map_err(|e| Error::FileRead {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    log::trace!("read {} bytes", data.len());
    Ok(data)
}

/// Read a plain file
pub fn load_from_file(path: &Path) -> Result<Vec<u8>> {
    log::debug!("loading from file: {}", path.display());
    fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a file, creating any missing parent directories
pub fn save_to_file(path: &Path, data: &[u8]) -> Result<()> {
    log::trace!("saving to file: {}", path.display());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, data).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_test_archive(path: &Path) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        writer
            .start_file("properties/resupply.inc", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"{radius 50\r\n").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_load_from_archive() {
        let dir = tempfile::tempdir().unwrap();
        let pak = dir.path().join("properties.pak");
        write_test_archive(&pak);

        let data = load_from_archive(&pak, Path::new("properties/resupply.inc")).unwrap();
        assert_eq!(data, b"{radius 50\r\n");
    }

    #[test]
    fn test_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let pak = dir.path().join("properties.pak");
        write_test_archive(&pak);

        let err = load_from_archive(&pak, Path::new("properties/missing.inc")).unwrap_err();
        assert!(matches!(err, Error::EntryNotFound { .. }));
    }

    #[test]
    fn test_missing_archive() {
        let err =
            load_from_archive(Path::new("/no/such/file.pak"), Path::new("x")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out/properties/resupply.inc");
        save_to_file(&target, b"data").unwrap();
        assert_eq!(load_from_file(&target).unwrap(), b"data");
    }
}
