// src/store/mod.rs
//
// The document store the catalog reads from and writes to. Documents are
// schemaless JSON objects grouped into named collections; the record shapes in
// `models` are enforced only by this crate.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::models::DocId;
use crate::watch::{Subscription, Watchers};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub type Fields = serde_json::Map<String, Value>;

pub type CollectionFeed = Subscription<Result<CollectionSnapshot, StoreError>>;
pub type DocumentFeed = Subscription<Result<DocumentSnapshot, StoreError>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("No document to update: {0}")]
    NotFound(String),
    #[error("Missing or insufficient permissions.")]
    PermissionDenied,
    #[error("Invalid document path: {0}")]
    InvalidPath(String),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Failed to encode fields: {0}")]
    Encode(String),
    #[error("Storage error: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// One document as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub data: Fields,
}

impl Document {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.data.clone())).map_err(|e| StoreError::Decode {
            path: self.id.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Point-in-time view of a single document. `data` is `None` when it does not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub id: DocId,
    pub data: Option<Fields>,
}

impl DocumentSnapshot {
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        match &self.data {
            None => Ok(None),
            Some(data) => Document {
                id: self.id.clone(),
                data: data.clone(),
            }
            .decode()
            .map(Some),
        }
    }
}

/// Point-in-time view of a whole collection, ordered by document id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSnapshot {
    pub docs: Vec<Document>,
}

/// Operations the catalog consumes from its backing store.
///
/// Watches push the current state immediately, then again after every write
/// that touches what they observe. Read failures arrive through the feed.
pub trait DocumentStore: Send + Sync {
    fn watch_collection(&self, collection: &str) -> CollectionFeed;

    fn watch_document(&self, collection: &str, id: &DocId) -> DocumentFeed;

    fn get_document(&self, collection: &str, id: &DocId) -> Result<DocumentSnapshot, StoreError>;

    /// Creates a document with a fresh id and returns that id.
    fn create_document(&self, collection: &str, fields: Fields) -> Result<DocId, StoreError>;

    /// Merges `fields` into an existing document's top-level fields.
    fn update_document(&self, collection: &str, id: &DocId, fields: Fields)
        -> Result<(), StoreError>;
}

/// Serializes a record into top-level document fields.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(StoreError::Encode(format!(
            "expected an object, got {other}"
        ))),
        Err(e) => Err(StoreError::Encode(e.to_string())),
    }
}

pub(crate) fn new_doc_id() -> DocId {
    DocId::new(uuid::Uuid::new_v4().simple().to_string())
}

pub(crate) fn check_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() || segment.contains('/') {
        return Err(StoreError::InvalidPath(segment.to_string()));
    }
    Ok(())
}

pub(crate) fn doc_path(collection: &str, id: &DocId) -> String {
    format!("{collection}/{id}")
}

/// Watch registries shared by the store implementations.
pub(crate) struct StoreWatchers {
    collections: Arc<Watchers<String, Result<CollectionSnapshot, StoreError>>>,
    documents: Arc<Watchers<(String, DocId), Result<DocumentSnapshot, StoreError>>>,
}

impl StoreWatchers {
    pub(crate) fn new() -> Self {
        StoreWatchers {
            collections: Watchers::new(),
            documents: Watchers::new(),
        }
    }

    pub(crate) fn watch_collection(
        &self,
        collection: &str,
        initial: Result<CollectionSnapshot, StoreError>,
    ) -> CollectionFeed {
        self.collections.watch(collection.to_string(), initial)
    }

    pub(crate) fn watch_document(
        &self,
        collection: &str,
        id: &DocId,
        initial: Result<DocumentSnapshot, StoreError>,
    ) -> DocumentFeed {
        self.documents
            .watch((collection.to_string(), id.clone()), initial)
    }

    pub(crate) fn collection_changed(
        &self,
        collection: &str,
        snapshot: Result<CollectionSnapshot, StoreError>,
    ) {
        self.collections
            .notify(|k| k == collection, |_| snapshot.clone());
    }

    pub(crate) fn document_changed(
        &self,
        collection: &str,
        id: &DocId,
        snapshot: Result<DocumentSnapshot, StoreError>,
    ) {
        self.documents.notify(
            |(c, d)| c == collection && d == id,
            |_| snapshot.clone(),
        );
    }

    /// Pushes `error` to every watcher of `collection` and its documents.
    pub(crate) fn fail_collection(&self, collection: &str, error: StoreError) {
        self.collections
            .notify(|k| k == collection, |_| Err(error.clone()));
        self.documents
            .notify(|(c, _)| c == collection, |_| Err(error.clone()));
    }

    pub(crate) fn watcher_count(&self) -> usize {
        self.collections.len() + self.documents.len()
    }
}
