//! Atomic output writer.
//!
//! Results are built fully in memory, written to a hidden sibling temp file,
//! then renamed over the destination, so a failed run never leaves a
//! half-written lexicon behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use dictbuilder_shared::{DictError, Result};

/// Metadata for a file written by [`write_atomic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Destination path.
    pub path: PathBuf,
    /// Hex SHA-256 of the content.
    pub sha256: String,
    /// Content length in bytes.
    pub size_bytes: usize,
}

/// Write `content` to `path` via temp file + rename, creating parent
/// directories as needed and replacing any existing file.
#[instrument(skip(content), fields(path = %path.display(), size = content.len()))]
pub fn write_atomic(path: &Path, content: &str) -> Result<WrittenFile> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            DictError::validation(format!("output path has no file name: {}", path.display()))
        })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| DictError::io(&dir, e))?;

    // Removed on drop unless persisted.
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(|e| DictError::io(&dir, e))?;

    temp.write_all(content.as_bytes())
        .map_err(|e| DictError::io(temp.path(), e))?;

    temp.persist(path).map_err(|e| DictError::io(path, e.error))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(sha256 = %sha256, "wrote output file");

    Ok(WrittenFile {
        path: path.to_path_buf(),
        sha256,
        size_bytes: content.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("db-writer-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn write_creates_missing_parent_dirs() {
        let tmp = temp_dir();
        let target = tmp.join("gcide").join("nested").join("gcide.txt");

        let written = write_atomic(&target, "apple\ta fruit\n").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "apple\ta fruit\n");
        assert_eq!(written.size_bytes, 14);
        assert_eq!(written.sha256.len(), 64);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_overwrites_and_leaves_no_temp_files() {
        let tmp = temp_dir();
        let target = tmp.join("out.txt");
        std::fs::write(&target, "old content that is longer\n").unwrap();

        write_atomic(&target, "new\n").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new\n");
        let leftovers: Vec<_> = std::fs::read_dir(&tmp)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                name.starts_with(".out.txt.") || name.ends_with(".tmp")
            })
            .collect();
        assert!(leftovers.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let tmp = temp_dir();
        // A non-empty directory at the destination makes the final rename fail
        // after the content has been written.
        let target = tmp.join("gcide.txt");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        let err = write_atomic(&target, "apple\ta fruit\n").unwrap_err();
        assert!(matches!(err, DictError::Io { .. }));

        let names: Vec<String> = std::fs::read_dir(&tmp)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["gcide.txt".to_string()]);
        assert!(target.join("keep").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn identical_content_hashes_identically() {
        let tmp = temp_dir();
        let a = write_atomic(&tmp.join("a.txt"), "same\n").unwrap();
        let b = write_atomic(&tmp.join("b.txt"), "same\n").unwrap();
        assert_eq!(a.sha256, b.sha256);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_rejects_path_without_file_name() {
        let err = write_atomic(Path::new("/"), "x").unwrap_err();
        assert!(err.to_string().contains("no file name"));
    }
}
