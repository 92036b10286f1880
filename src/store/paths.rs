//! Logical path resolution
//!
//! Maps logical store paths (`posts`, `posts/<id>`) to confined filesystem
//! locations and extracts identifiers back out of them. Resolution is pure
//! string/path work; nothing here touches the filesystem.

use crate::error::{Error, Result};
use crate::validation::validate_logical_path;
use std::path::{Path, PathBuf};

/// File extension of record files
pub const RECORD_EXT: &str = "yaml";

/// Resolves logical paths against a store root
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a collection's record files
    pub fn collection_dir(&self, logical: &str) -> Result<PathBuf> {
        validate_logical_path(logical)?;
        Ok(self.root.join(logical))
    }

    /// Filesystem path of a single record, with the extension appended.
    ///
    /// An absolute path already under the store root is used verbatim; this
    /// is the escape hatch for internal callers that hold a resolved path
    /// (delete-by-reference via a record's own `path`).
    pub fn record_path(&self, logical: &str) -> Result<PathBuf> {
        let as_path = Path::new(logical);

        if as_path.is_absolute() {
            if as_path.starts_with(&self.root) {
                return Ok(as_path.to_path_buf());
            }
            return Err(Error::InvalidPath {
                path: logical.to_string(),
                reason: "absolute path outside the store root",
            });
        }

        validate_logical_path(logical)?;
        Ok(self.root.join(format!("{}.{}", logical, RECORD_EXT)))
    }
}

/// Identifier of a record file (the filename with the extension stripped)
pub fn record_id(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

/// Whether a directory entry is a record file
pub fn is_record_file(path: &Path) -> bool {
    path.extension().map(|e| e == RECORD_EXT).unwrap_or(false)
}
