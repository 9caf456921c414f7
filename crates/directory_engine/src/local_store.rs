//! Filesystem backend for the store seams: one JSON array per collection
//! under `{root}/collections/` and uploaded blobs under `{root}/blobs/`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bytes::Bytes;
use chrono::Utc;
use directory_logging::{dir_debug, dir_info};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::persist::{PersistError, StoreFiles};
use crate::store::{BlobStore, NewDocument, RemoteStore};
use crate::StoreError;

pub const ID_FIELD: &str = "id";

impl From<PersistError> for StoreError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::StoreDir(message) => StoreError::Unavailable(message),
            PersistError::NotAnArray(name) => StoreError::Collection {
                name,
                message: "collection file is not a JSON array".to_string(),
            },
            PersistError::Io(err) => StoreError::Io(err.to_string()),
            PersistError::Json(err) => StoreError::Json(err.to_string()),
        }
    }
}

pub struct LocalStore {
    files: StoreFiles,
    public_base_url: String,
    writes: Mutex<()>,
}

impl LocalStore {
    /// `public_base_url` prefixes the object path of uploaded blobs.
    pub fn new(root: PathBuf, public_base_url: impl Into<String>) -> Self {
        Self {
            files: StoreFiles::new(root),
            public_base_url: public_base_url.into(),
            writes: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        self.files.root()
    }

    fn check_collection_name(name: &str) -> Result<(), StoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
        if !valid {
            return Err(StoreError::Collection {
                name: name.to_string(),
                message: "invalid collection name".to_string(),
            });
        }
        Ok(())
    }

    fn read_collection(&self, name: &str) -> Result<Vec<Value>, StoreError> {
        Self::check_collection_name(name)?;
        Ok(self.files.read_collection(name)?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.writes
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl RemoteStore for LocalStore {
    async fn connection_ready(&self) -> Result<(), StoreError> {
        self.files.ensure_root()?;
        Ok(())
    }

    async fn fetch_collection(&self, name: &str, limit: usize) -> Result<Vec<Value>, StoreError> {
        let mut records = self.read_collection(name)?;
        records.truncate(limit);
        dir_debug!("Fetched {} records from {}", records.len(), name);
        Ok(records)
    }

    async fn add_document(&self, collection: &str, doc: NewDocument) -> Result<String, StoreError> {
        let _guard = self.lock()?;
        let mut records = self.read_collection(collection)?;

        let now = Utc::now();
        let mut fields = doc.fields;
        if let Some(field) = doc.server_timestamp {
            fields.insert(field, Value::String(now.to_rfc3339()));
        }
        let id = document_id(collection, &Value::Object(fields.clone()), now.timestamp_nanos_opt());
        fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        records.push(Value::Object(fields));
        self.files.write_collection(collection, &records)?;
        dir_info!("Added document {} to {}", id, collection);
        Ok(id)
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalStore {
    async fn upload_blob(&self, path: &str, bytes: Bytes) -> Result<String, StoreError> {
        if path.is_empty() || path.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(StoreError::NotFound(format!("invalid blob path: {path}")));
        }
        let target = self.files.write_blob(path, &bytes)?;
        dir_info!("Stored {} bytes at {}", bytes.len(), target.display());
        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            path
        ))
    }
}

fn document_id(collection: &str, doc: &Value, nanos: Option<i64>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(collection.as_bytes());
    hasher.update(doc.to_string().as_bytes());
    hasher.update(nanos.unwrap_or_default().to_le_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(20);
    for byte in digest.iter().take(10) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
