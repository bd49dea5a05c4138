//! Content-addressed blob storage.
//!
//! A blob is addressed by the lowercase hex SHA-256 of its bytes, so a handle
//! doubles as an integrity check when the blob is read back.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::error::{StoreError, StoreResult};

/// Length of a handle in hex characters.
pub const HANDLE_LEN: usize = 64;

/// Content address of a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobHandle(String);

impl BlobHandle {
    /// Compute the handle for `bytes`.
    #[must_use]
    pub fn for_content(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Handle as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn matches(&self, bytes: &[u8]) -> bool {
        Self::for_content(bytes) == *self
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BlobHandle {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        let valid = s.len() == HANDLE_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(StoreError::InvalidHandle(s.to_owned()))
        }
    }
}

/// Blob store interface.
///
/// Putting the same bytes twice returns the same handle.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return their handle.
    ///
    /// # Errors
    /// Returns `QuotaExceeded` or an I/O error depending on the backend.
    fn put(&self, bytes: &[u8]) -> StoreResult<BlobHandle>;

    /// Retrieve the bytes stored under `handle`.
    ///
    /// # Errors
    /// Returns `NotFound` if nothing is stored under the handle.
    fn get(&self, handle: &BlobHandle) -> StoreResult<Vec<u8>>;

    /// Check whether a blob exists.
    fn contains(&self, handle: &BlobHandle) -> bool;
}

/// Configuration for in-memory blob store.
#[derive(Debug, Clone)]
pub struct MemoryBlobStoreConfig {
    /// Maximum storage in bytes.
    pub max_bytes: u64,
}

impl Default for MemoryBlobStoreConfig {
    fn default() -> Self {
        Self {
            max_bytes: 64 * 1024 * 1024, // 64MB
        }
    }
}

/// In-memory blob store.
///
/// Suitable for testing and single-process use.
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<BlobHandle, Vec<u8>>>,
    config: MemoryBlobStoreConfig,
    used_bytes: RwLock<u64>,
}

impl MemoryBlobStore {
    /// Create a new in-memory blob store.
    #[must_use]
    pub fn new(config: MemoryBlobStoreConfig) -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            config,
            used_bytes: RwLock::new(0),
        }
    }

    /// Total bytes currently stored.
    #[must_use]
    pub fn storage_used(&self) -> u64 {
        *self.used_bytes.read()
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new(MemoryBlobStoreConfig::default())
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, bytes: &[u8]) -> StoreResult<BlobHandle> {
        let handle = BlobHandle::for_content(bytes);
        let size = bytes.len() as u64;

        let mut blobs = self.blobs.write();
        if blobs.contains_key(&handle) {
            return Ok(handle);
        }

        let mut used = self.used_bytes.write();
        if *used + size > self.config.max_bytes {
            return Err(StoreError::QuotaExceeded {
                used: *used,
                max: self.config.max_bytes,
            });
        }

        blobs.insert(handle.clone(), bytes.to_vec());
        *used += size;

        tracing::debug!(%handle, size, "stored blob in memory");
        Ok(handle)
    }

    fn get(&self, handle: &BlobHandle) -> StoreResult<Vec<u8>> {
        self.blobs
            .read()
            .get(handle)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(handle.clone()))
    }

    fn contains(&self, handle: &BlobHandle) -> bool {
        self.blobs.read().contains_key(handle)
    }
}

/// Blob store backed by one file per blob under a root directory.
#[derive(Debug, Clone)]
pub struct DirBlobStore {
    root: PathBuf,
}

impl DirBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, handle: &BlobHandle) -> PathBuf {
        self.root.join(handle.as_str())
    }
}

impl BlobStore for DirBlobStore {
    fn put(&self, bytes: &[u8]) -> StoreResult<BlobHandle> {
        let handle = BlobHandle::for_content(bytes);
        let path = self.path_for(&handle);
        if !path.exists() {
            // Stage and rename; the final path only ever holds complete blobs.
            let staging = self.root.join(format!(".{handle}.tmp"));
            fs::write(&staging, bytes)?;
            fs::rename(&staging, &path)?;
            tracing::debug!(%handle, size = bytes.len(), "stored blob on disk");
        }
        Ok(handle)
    }

    fn get(&self, handle: &BlobHandle) -> StoreResult<Vec<u8>> {
        let bytes = match fs::read(self.path_for(handle)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(handle.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        if !handle.matches(&bytes) {
            tracing::warn!(%handle, "stored blob failed hash check");
            return Err(StoreError::IntegrityMismatch(handle.clone()));
        }
        Ok(bytes)
    }

    fn contains(&self, handle: &BlobHandle) -> bool {
        self.path_for(handle).is_file()
    }
}
