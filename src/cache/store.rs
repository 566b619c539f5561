//! Cache Store Module
//!
//! Main cache engine: reads, writes and deletes JSON documents on disk,
//! applies lazy read-time expiry, and enumerates or erases key subtrees.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tokio::fs;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::cache::expiry::{self, Freshness};
use crate::cache::{codec, KeyLocks, PathResolver, DOCUMENT_EXTENSION};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Json Cache ==
/// Filesystem-backed document cache rooted at a single directory.
///
/// Every operation comes in two flavours:
/// - `try_*` returns an explicit [`Result`]; a missing or expired entry is
///   `Ok(None)` / `Ok(false)`, and failures are tagged [`CacheError`]s.
/// - the plain method is best-effort: it never fails, logs the error and
///   returns the empty outcome instead.
///
/// Operations on the same key are serialized in-process through
/// [`KeyLocks`]; writers in other processes still race at the filesystem
/// level and the last write wins.
#[derive(Debug)]
pub struct JsonCache {
    /// Key to file mapping under the cache root
    paths: PathResolver,
    /// Per-key advisory locks
    locks: KeyLocks,
}

impl JsonCache {
    // == Constructor ==
    /// Creates a cache rooted at `root`. The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: PathResolver::new(root),
            locks: KeyLocks::new(),
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.root.clone())
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    /// Returns the path resolver used by this cache.
    pub fn paths(&self) -> &PathResolver {
        &self.paths
    }

    fn locate(&self, key: &str) -> Result<(String, PathBuf)> {
        let path = self.paths.resolve(key)?;
        Ok((PathResolver::normalize(key)?, path))
    }

    // == Write ==
    /// Stores `value` under `key`, creating parent directories as needed.
    ///
    /// Returns `Ok(false)` without touching the filesystem when `value` is
    /// null. The file is truncated and rewritten in place; an interrupted
    /// write can leave a partial file behind.
    ///
    /// # Errors
    /// `InvalidKey` for empty or unsafe keys, `Io` on filesystem failure.
    pub async fn try_write(&self, key: &str, value: &Value) -> Result<bool> {
        let (key, path) = self.locate(key)?;
        if codec::is_absent(value) {
            return Ok(false);
        }

        let text = codec::serialize(value).map_err(|source| CacheError::Malformed {
            key: key.clone(),
            source,
        })?;

        let _guard = self.locks.lock(&key).await;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::io(parent, e))?;
        }

        info!("Writing file: {}", self.paths.display_relative(&path));
        fs::write(&path, text)
            .await
            .map_err(|e| CacheError::io(&path, e))?;

        Ok(true)
    }

    /// Best-effort [`try_write`](Self::try_write): invalid keys and null values are silently ignored.
    pub async fn write(&self, key: &str, value: &Value) {
        settle("write", self.try_write(key, value).await);
    }

    // == Read Raw ==
    /// Reads the stored text for `key`.
    ///
    /// With a non-zero `max_age`, an entry older than that is deleted and
    /// reported as `Ok(None)`, the same as an entry that never existed.
    pub async fn try_read_raw(&self, key: &str, max_age: Option<Duration>) -> Result<Option<String>> {
        let (key, path) = self.locate(key)?;
        let _guard = self.locks.lock(&key).await;

        let freshness = match expiry::file_freshness(&path, max_age).await {
            Ok(freshness) => freshness,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = %key, "Cache miss");
                return Ok(None);
            }
            Err(e) => return Err(CacheError::io(&path, e)),
        };

        if let Freshness::Expired { age } = freshness {
            info!(
                "Deleting cache with age {:?} from path '{}'",
                age,
                self.paths.display_relative(&path)
            );
            remove_entry(&path).await?;
            return Ok(None);
        }

        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
            Err(e) => Err(CacheError::io(&path, e)),
        }
    }

    /// Best-effort [`try_read_raw`](Self::try_read_raw).
    pub async fn read_raw(&self, key: &str, max_age: Option<Duration>) -> Option<String> {
        settle("read_raw", self.try_read_raw(key, max_age).await)
    }

    // == Delete ==
    /// Removes the entry for `key`.
    ///
    /// Returns `Ok(false)` if there was nothing to delete.
    pub async fn try_delete(&self, key: &str) -> Result<bool> {
        let (key, path) = self.locate(key)?;
        let _guard = self.locks.lock(&key).await;
        remove_entry(&path).await
    }

    /// Best-effort [`try_delete`](Self::try_delete).
    pub async fn delete(&self, key: &str) -> bool {
        settle("delete", self.try_delete(key).await)
    }

    // == Load Document ==
    /// Reads and decodes the document for `key`, honouring `max_age`.
    ///
    /// An empty file is treated as absent.
    ///
    /// # Errors
    /// `Malformed` if the stored text is not valid JSON.
    pub async fn try_load_document(
        &self,
        key: &str,
        max_age: Option<Duration>,
    ) -> Result<Option<Value>> {
        let Some(text) = self.try_read_raw(key, max_age).await? else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }

        codec::parse(&text)
            .map(Some)
            .map_err(|source| CacheError::Malformed {
                key: key.to_string(),
                source,
            })
    }

    /// Best-effort [`try_load_document`](Self::try_load_document): missing,
    /// expired and undecodable entries all come back as None.
    pub async fn load_document(&self, key: &str, max_age: Option<Duration>) -> Option<Value> {
        settle("load_document", self.try_load_document(key, max_age).await)
    }

    // == Load Field ==
    /// Loads the document for `key` and returns one top-level field of it.
    ///
    /// A document that is not an object, or has no such field, yields `Ok(None)`.
    pub async fn try_load_field(&self, key: &str, field: &str) -> Result<Option<Value>> {
        let document = self.try_load_document(key, None).await?;
        Ok(document.and_then(|doc| codec::index(&doc, field)))
    }

    /// Best-effort [`try_load_field`](Self::try_load_field).
    pub async fn load_field(&self, key: &str, field: &str) -> Option<Value> {
        settle("load_field", self.try_load_field(key, field).await)
    }

    // == List Subtree ==
    /// Loads every document below `prefix`.
    ///
    /// Only files named `<name_filter>*.json` are considered, either directly
    /// in the prefix directory or, with `recursive`, anywhere beneath it. No
    /// expiry is applied. Undecodable documents are skipped. Results follow
    /// filesystem enumeration order, which is not sorted.
    ///
    /// # Errors
    /// `NotFound` if the prefix directory does not exist, `Io` if listing
    /// fails part way. Use [`list_subtree`](Self::list_subtree) to keep the
    /// documents collected before a failure.
    pub async fn try_list_subtree(
        &self,
        prefix: &str,
        recursive: bool,
        name_filter: &str,
    ) -> Result<Vec<Value>> {
        match self.collect_subtree(prefix, recursive, name_filter).await {
            (documents, None) => Ok(documents),
            (_, Some(e)) => Err(e),
        }
    }

    /// Best-effort [`try_list_subtree`](Self::try_list_subtree): returns
    /// whatever was collected before any failure.
    pub async fn list_subtree(&self, prefix: &str, recursive: bool, name_filter: &str) -> Vec<Value> {
        let (documents, failure) = self.collect_subtree(prefix, recursive, name_filter).await;
        if let Some(e) = failure {
            error!(prefix = %prefix, error = %e, "Exception at list_subtree");
        }
        documents
    }

    async fn collect_subtree(
        &self,
        prefix: &str,
        recursive: bool,
        name_filter: &str,
    ) -> (Vec<Value>, Option<CacheError>) {
        let dir = match self.paths.resolve_dir(prefix) {
            Ok(dir) => dir,
            Err(e) => return (Vec::new(), Some(e)),
        };

        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return (Vec::new(), Some(CacheError::NotFound(prefix.to_string()))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return (Vec::new(), Some(CacheError::NotFound(prefix.to_string())))
            }
            Err(e) => return (Vec::new(), Some(CacheError::io(&dir, e))),
        }

        let filter = name_filter.to_string();
        let scan = tokio::task::spawn_blocking(move || scan_dir(&dir, recursive, &filter)).await;
        let (files, scan_failure) = match scan {
            Ok(scanned) => scanned,
            Err(e) => return (Vec::new(), Some(CacheError::Internal(e.to_string()))),
        };

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            let Some(key) = self
                .paths
                .to_logical_key(&file)
                .filter(|key| PathResolver::is_valid_key(key))
            else {
                debug!(path = %file.display(), "Skipping file without a valid key");
                continue;
            };
            match self.try_load_document(&key, None).await {
                Ok(Some(document)) => documents.push(document),
                Ok(None) => {}
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping unreadable document");
                }
            }
        }

        (documents, scan_failure)
    }

    // == Delete Folder ==
    /// Recursively deletes the directory behind `folder`.
    ///
    /// Returns `Ok(true)` only if the directory is gone afterwards and
    /// `Ok(false)` if there was no such directory. The cache root itself can
    /// never be deleted this way.
    pub async fn try_delete_folder(&self, folder: &str) -> Result<bool> {
        if !PathResolver::is_valid_key(folder) {
            return Err(CacheError::InvalidKey(folder.to_string()));
        }
        let dir = self.paths.resolve_dir(folder)?;

        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(CacheError::io(&dir, e)),
        }

        fs::remove_dir_all(&dir)
            .await
            .map_err(|e| CacheError::io(&dir, e))?;

        let still_exists = fs::try_exists(&dir)
            .await
            .map_err(|e| CacheError::io(&dir, e))?;
        Ok(!still_exists)
    }

    /// Best-effort [`try_delete_folder`](Self::try_delete_folder).
    pub async fn delete_folder(&self, folder: &str) -> bool {
        settle("delete_folder", self.try_delete_folder(folder).await)
    }
}

// == Helpers ==
/// Removes one entry file; a file that is already gone is not an error.
async fn remove_entry(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::io(path, e)),
    }
}

/// Collects document files under `dir`, stopping at the first listing error.
fn scan_dir(dir: &Path, recursive: bool, name_filter: &str) -> (Vec<PathBuf>, Option<CacheError>) {
    let mut walker = WalkDir::new(dir).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                return (files, Some(CacheError::io(path, err.into())));
            }
        };
        if entry.file_type().is_file() && matches_filter(entry.file_name(), name_filter) {
            files.push(entry.into_path());
        }
    }
    (files, None)
}

/// Matches `<name_filter>*.json`.
fn matches_filter(file_name: &OsStr, name_filter: &str) -> bool {
    let Some(name) = file_name.to_str() else {
        return false;
    };
    name.starts_with(name_filter)
        && name
            .strip_suffix(DOCUMENT_EXTENSION)
            .is_some_and(|rest| rest.ends_with('.'))
}

/// Collapses an explicit result into the best-effort "nothing happened" value.
fn settle<T: Default>(operation: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(CacheError::InvalidKey(key)) => {
            debug!(operation, key = %key, "Ignoring invalid key");
            T::default()
        }
        Err(e) => {
            error!(operation, error = %e, "Exception at {}", operation);
            T::default()
        }
    }
}
