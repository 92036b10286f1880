//! The document store
//!
//! One directory per collection, one YAML file per record. A record is
//! created with a generated UUID as its filename, mutated by a
//! read-merge-write cycle, and destroyed by unlinking its file.
//!
//! Writes are serialized per resolved path and land via a sibling temp
//! file followed by an atomic rename, so a reader observes either the
//! fully-old or fully-new content of a record, never a torn write.

pub mod codec;
pub mod paths;
pub mod record;

use crate::error::{Error, Result};
use crate::query::{Rule, Search};
use paths::{Resolver, RECORD_EXT};
use record::{Fields, Record, Revision, Value};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use uuid::Uuid;
use walkdir::WalkDir;

/// Registry of per-path write locks.
///
/// One async mutex per resolved record path; entries accumulate for the
/// paths a process touches, which stays small for collections of the
/// expected size.
#[derive(Default)]
struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl PathLocks {
    fn get(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock();
        map.entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// The store handle
///
/// Constructed once with a root directory and passed by reference to every
/// caller; temporary-directory roots give tests full isolation.
pub struct Store {
    resolver: Resolver,
    locks: PathLocks,
}

impl Store {
    /// Open a store rooted at the given directory
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            resolver: Resolver::new(root),
            locks: PathLocks::default(),
        }
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// List every record directly inside a collection directory.
    ///
    /// Returns an empty list for an absent collection. A record that fails
    /// to decode fails the whole listing.
    pub async fn list(&self, collection: &str) -> Result<Vec<Record>> {
        let dir = self.resolver.collection_dir(collection)?;
        let mut records = Vec::new();

        if !dir.exists() {
            return Ok(records);
        }

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if paths::is_record_file(path) {
                records.push(self.read_record(path).await?);
            }
        }

        Ok(records)
    }

    /// Read a single record by logical path
    pub async fn record(&self, path: &str) -> Result<Option<Record>> {
        let full = self.resolver.record_path(path)?;
        if !full.exists() {
            return Ok(None);
        }
        self.read_record(&full).await.map(Some)
    }

    /// Read one field of a record
    pub async fn field(&self, path: &str, key: &str) -> Result<Option<Value>> {
        Ok(self
            .record(path)
            .await?
            .and_then(|r| r.fields.get(key).cloned()))
    }

    /// Create a record in a collection and return its generated identifier.
    ///
    /// The collection directory is created if absent.
    pub async fn create_in(&self, collection: &str, fields: Fields) -> Result<String> {
        let dir = self.resolver.collection_dir(collection)?;
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::write(&dir, e))?;

        let id = Uuid::new_v4().to_string();
        let full = dir.join(format!("{}.{}", id, RECORD_EXT));

        let lock = self.locks.get(&full);
        let _guard = lock.lock().await;
        self.write_file(&full, fields).await?;

        tracing::debug!(collection, %id, "created record");
        Ok(id)
    }

    /// Write a full record at an exact logical path, overwriting any
    /// existing content. The parent directory is created if absent.
    pub async fn write_at(&self, path: &str, fields: Fields) -> Result<()> {
        let full = self.resolver.record_path(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::write(parent, e))?;
        }

        let lock = self.locks.get(&full);
        let _guard = lock.lock().await;
        self.write_file(&full, fields).await
    }

    /// Merge partial fields over an existing record (right-biased) and
    /// write the result back.
    ///
    /// An absent record merges over an empty mapping. Unlike `create_in`,
    /// the parent directory is not created; writing into a missing
    /// directory surfaces as `Error::Write`.
    pub async fn update(&self, path: &str, partial: Fields) -> Result<()> {
        let full = self.resolver.record_path(path)?;

        let lock = self.locks.get(&full);
        let _guard = lock.lock().await;

        let mut fields = if full.exists() {
            self.read_record(&full).await?.fields
        } else {
            Fields::new()
        };
        fields.extend(partial);

        self.write_file(&full, fields).await
    }

    /// As `update`, but fails with `Error::Conflict` when the stored
    /// revision no longer matches `expected`.
    ///
    /// For callers that hold a record across a user interaction (two
    /// editors on the same post); plain `update` already cannot lose a
    /// concurrent in-process write.
    pub async fn update_checked(
        &self,
        path: &str,
        partial: Fields,
        expected: Revision,
    ) -> Result<()> {
        let full = self.resolver.record_path(path)?;

        let lock = self.locks.get(&full);
        let _guard = lock.lock().await;

        let current = if full.exists() {
            Some(self.read_record(&full).await?)
        } else {
            None
        };

        let rev = current.as_ref().map(|r| r.rev).unwrap_or_default();
        if rev != expected {
            return Err(Error::Conflict { path: full });
        }

        let mut fields = current.map(|r| r.fields).unwrap_or_default();
        fields.extend(partial);

        self.write_file(&full, fields).await
    }

    /// Delete a record by logical path. Returns false if it did not exist.
    pub async fn remove(&self, path: &str) -> Result<bool> {
        let full = self.resolver.record_path(path)?;
        self.remove_file(&full).await
    }

    /// Delete the first record in a collection matching the rules.
    /// Returns false if nothing matched.
    pub async fn remove_where(&self, collection: &str, rules: &[Rule]) -> Result<bool> {
        match self.find_first(collection, rules).await? {
            Some(record) => self.remove_file(&record.path).await,
            None => Ok(false),
        }
    }

    /// All records in a collection matching every rule
    pub async fn find(&self, collection: &str, rules: &[Rule]) -> Result<Vec<Record>> {
        let items = self.list(collection).await?;
        Ok(Search::new(items).filter(rules).get())
    }

    /// First record in a collection matching every rule
    pub async fn find_first(&self, collection: &str, rules: &[Rule]) -> Result<Option<Record>> {
        let items = self.list(collection).await?;
        Ok(Search::new(items).filter(rules).first())
    }

    /// Read and decode a record file, attaching id, path, and revision
    async fn read_record(&self, path: &Path) -> Result<Record> {
        let bytes = fs::read(path).await.map_err(|e| Error::read(path, e))?;
        let rev = Revision(crc32fast::hash(&bytes));

        let content = String::from_utf8(bytes).map_err(|_| Error::Decode {
            path: path.to_path_buf(),
            message: "not valid UTF-8".into(),
        })?;

        let fields = codec::decode(&content).map_err(|e| Error::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let id = paths::record_id(path).ok_or_else(|| Error::InvalidPath {
            path: path.display().to_string(),
            reason: "record file has no identifier stem",
        })?;

        Ok(Record {
            id,
            path: path.to_path_buf(),
            rev,
            fields,
        })
    }

    /// Encode and commit a record file via temp file + atomic rename.
    ///
    /// Callers must hold the path lock. Transient keys never persist
    /// inside the body.
    async fn write_file(&self, path: &Path, mut fields: Fields) -> Result<()> {
        fields.remove("_id");
        fields.remove("_path");

        let content = codec::encode(&fields);
        let tmp = path.with_extension(format!("{}.tmp", RECORD_EXT));

        fs::write(&tmp, content)
            .await
            .map_err(|e| Error::write(&tmp, e))?;
        fs::rename(&tmp, path)
            .await
            .map_err(|e| Error::write(path, e))?;

        Ok(())
    }

    async fn remove_file(&self, full: &Path) -> Result<bool> {
        let lock = self.locks.get(full);
        let _guard = lock.lock().await;

        if !full.exists() {
            return Ok(false);
        }

        fs::remove_file(full)
            .await
            .map_err(|e| Error::write(full, e))?;

        tracing::debug!(path = %full.display(), "removed record");
        Ok(true)
    }
}
