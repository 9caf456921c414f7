//! Adapter seams for the backing document database and object store.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::StoreError;

/// A document to insert. The store fills `server_timestamp` (when set) with
/// its own clock at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub fields: Map<String, Value>,
    pub server_timestamp: Option<String>,
}

impl NewDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            server_timestamp: None,
        }
    }

    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamp = Some(field.into());
        self
    }
}

#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Resolves once the backend is reachable.
    async fn connection_ready(&self) -> Result<(), StoreError>;

    /// Bounded read of up to `limit` records of one collection.
    async fn fetch_collection(&self, name: &str, limit: usize) -> Result<Vec<Value>, StoreError>;

    /// Single-document insert. Returns the new document id.
    async fn add_document(&self, collection: &str, doc: NewDocument) -> Result<String, StoreError>;
}

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `path` and returns a retrievable URL.
    async fn upload_blob(&self, path: &str, bytes: Bytes) -> Result<String, StoreError>;
}
