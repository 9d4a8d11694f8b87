use async_trait::async_trait;
use axum::body::Bytes;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;

/// StorageError
///
/// Failures of the upload store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload rejected: {0}")]
    Rejected(String),
}

/// StoredFile
///
/// A file that has been written to the upload store. `path` is relative to
/// the public root (`uploads/<name>`), `url` is the absolute form kept on
/// records.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub field: String,
    pub path: String,
    pub url: String,
    pub size: usize,
}

/// StorageService
///
/// Defines the contract for persisting uploaded files. Handlers only see this
/// trait, so tests swap in `MockStorageService` without touching the disk.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the upload directory if it does not exist. Called at startup.
    async fn ensure_upload_dir(&self) -> Result<(), StorageError>;

    /// Persists one uploaded file received under the form field `field`.
    ///
    /// The stored name is `{field}-{unix_millis}{.ext}` where the extension
    /// comes from the client's original filename.
    async fn save(
        &self,
        field: &str,
        original_name: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, StorageError>;

    /// Lists the file names of a directory, sorted.
    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>, StorageError>;
}

/// LocalDiskStorage
///
/// Writes uploads below a directory on the local filesystem, which the router
/// also serves under `/uploads` and `/files`.
#[derive(Clone, Debug)]
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for LocalDiskStorage {
    async fn ensure_upload_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    async fn save(
        &self,
        field: &str,
        original_name: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, StorageError> {
        let name = stored_file_name(field, original_name, unix_millis());
        tokio::fs::write(self.root.join(&name), &bytes).await?;

        tracing::debug!(field, name = %name, size = bytes.len(), "stored upload");

        let path = format!("uploads/{}", name);
        Ok(StoredFile {
            field: field.to_string(),
            url: format!("{}/{}", self.public_base_url, path),
            path,
            size: bytes.len(),
        })
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>, StorageError> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// stored_file_name
///
/// Builds the on-disk name for an upload. Both the field name and the
/// extension come from the client, so anything that could act as a path
/// component is stripped.
pub fn stored_file_name(field: &str, original_name: &str, millis: u128) -> String {
    let field: String = field
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let field = if field.is_empty() { "file".to_string() } else { field };

    let ext: String = Path::new(original_name)
        .extension()
        .map(|ext| ext.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if ext.is_empty() {
        format!("{}-{}", field, millis)
    } else {
        format!("{}-{}.{}", field, millis, ext)
    }
}

/// MockStorageService
///
/// In-memory `StorageService` for tests. Records every save so assertions can
/// inspect what a handler uploaded.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    pub saved: Arc<Mutex<Vec<StoredFile>>>,
    pub listing: Vec<String>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_listing(names: &[&str]) -> Self {
        Self {
            listing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn saved_files(&self) -> Vec<StoredFile> {
        self.saved.lock().map(|files| files.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_upload_dir(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn save(
        &self,
        field: &str,
        original_name: &str,
        bytes: Bytes,
    ) -> Result<StoredFile, StorageError> {
        if self.should_fail {
            return Err(StorageError::Rejected("mock storage failure".to_string()));
        }

        let mut saved = self
            .saved
            .lock()
            .map_err(|_| StorageError::Rejected("mock storage poisoned".to_string()))?;

        // Sequence number instead of a clock keeps names deterministic.
        let path = format!("uploads/{}", stored_file_name(field, original_name, saved.len() as u128));
        let file = StoredFile {
            field: field.to_string(),
            url: format!("http://localhost:3000/{}", path),
            path,
            size: bytes.len(),
        };
        saved.push(file.clone());
        Ok(file)
    }

    async fn list_dir(&self, _dir: &Path) -> Result<Vec<String>, StorageError> {
        if self.should_fail {
            return Err(StorageError::Rejected("mock storage failure".to_string()));
        }
        Ok(self.listing.clone())
    }
}

/// StorageState
///
/// The concrete type used to share the upload store across the application state.
pub type StorageState = Arc<dyn StorageService>;
