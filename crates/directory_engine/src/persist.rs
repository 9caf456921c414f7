//! On-disk layout of the local store:
//!
//! ```text
//! {root}/collections/{name}.json   one JSON array of documents
//! {root}/blobs/{object path}       uploaded bytes
//! ```
//!
//! Every write lands through a sibling temp file and a rename, so readers
//! see either the previous collection or the new one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

const COLLECTIONS_DIR: &str = "collections";
const BLOBS_DIR: &str = "blobs";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("store directory missing or not writable: {0}")]
    StoreDir(String),
    #[error("collection '{0}' is not a JSON array")]
    NotAnArray(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct StoreFiles {
    root: PathBuf,
}

impl StoreFiles {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root if missing and checks it takes writes.
    pub fn ensure_root(&self) -> Result<(), PersistError> {
        ensure_dir(&self.root)
    }

    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(COLLECTIONS_DIR).join(format!("{name}.json"))
    }

    pub fn blob_path(&self, object_path: &str) -> PathBuf {
        self.root.join(BLOBS_DIR).join(object_path)
    }

    /// Documents of `name` in insertion order. A collection never written is empty.
    pub fn read_collection(&self, name: &str) -> Result<Vec<Value>, PersistError> {
        let path = self.collection_path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&raw)? {
            Value::Array(documents) => Ok(documents),
            _ => Err(PersistError::NotAnArray(name.to_string())),
        }
    }

    pub fn write_collection(&self, name: &str, documents: &[Value]) -> Result<PathBuf, PersistError> {
        let json = serde_json::to_vec_pretty(documents)?;
        let target = self.collection_path(name);
        replace_atomically(&target, &json)?;
        Ok(target)
    }

    /// `object_path` may contain subdirectories, which are created as needed.
    pub fn write_blob(&self, object_path: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        let target = self.blob_path(object_path);
        replace_atomically(&target, bytes)?;
        Ok(target)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StoreDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StoreDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StoreDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::StoreDir(e.to_string()))?;
    Ok(())
}

fn replace_atomically(target: &Path, content: &[u8]) -> Result<(), PersistError> {
    let parent = target
        .parent()
        .ok_or_else(|| PersistError::StoreDir(format!("{} has no parent", target.display())))?;
    ensure_dir(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}
