// src/store/sqlite.rs

use super::{
    check_segment, doc_path, new_doc_id, CollectionFeed, CollectionSnapshot, Document,
    DocumentFeed, DocumentSnapshot, DocumentStore, Fields, StoreError, StoreWatchers,
};
use crate::database;
use crate::models::DocId;
use crate::repository;
use crate::watch::Subscription;
use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Document store persisted to a single SQLite table.
pub struct SqliteStore {
    db: Mutex<Connection>,
    watchers: StoreWatchers,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!("Database path: {:?}", path);
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        database::init_db(&conn)?;
        Ok(SqliteStore {
            db: Mutex::new(conn),
            watchers: StoreWatchers::new(),
        })
    }

    /// When a document was last written, if it exists.
    pub fn last_modified(
        &self,
        collection: &str,
        id: &DocId,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let ts = repository::get_updated_at(&self.conn(), collection, id.as_str())?;
        Ok(ts.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)))
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_collection(&self, collection: &str) -> Result<CollectionSnapshot, StoreError> {
        let rows = repository::list_documents(&self.conn(), collection)?;
        let docs = rows
            .into_iter()
            .map(|row| {
                let id = DocId::new(row.id);
                parse_body(&doc_path(collection, &id), &row.data).map(|data| Document { id, data })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CollectionSnapshot { docs })
    }

    fn read_document(&self, collection: &str, id: &DocId) -> Result<DocumentSnapshot, StoreError> {
        let body = repository::find_document(&self.conn(), collection, id.as_str())?;
        let data = body
            .map(|body| parse_body(&doc_path(collection, id), &body))
            .transpose()?;
        Ok(DocumentSnapshot {
            id: id.clone(),
            data,
        })
    }

    fn publish(&self, collection: &str, id: &DocId) {
        self.watchers
            .collection_changed(collection, self.read_collection(collection));
        self.watchers
            .document_changed(collection, id, self.read_document(collection, id));
    }
}

fn parse_body(path: &str, body: &str) -> Result<Fields, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn encode_body(fields: &Fields) -> Result<String, StoreError> {
    serde_json::to_string(fields).map_err(|e| StoreError::Encode(e.to_string()))
}

impl DocumentStore for SqliteStore {
    fn watch_collection(&self, collection: &str) -> CollectionFeed {
        if let Err(e) = check_segment(collection) {
            return Subscription::once(Err(e));
        }
        self.watchers
            .watch_collection(collection, self.read_collection(collection))
    }

    fn watch_document(&self, collection: &str, id: &DocId) -> DocumentFeed {
        if let Err(e) = check_segment(collection).and_then(|_| check_segment(id.as_str())) {
            return Subscription::once(Err(e));
        }
        self.watchers
            .watch_document(collection, id, self.read_document(collection, id))
    }

    fn get_document(&self, collection: &str, id: &DocId) -> Result<DocumentSnapshot, StoreError> {
        check_segment(collection)?;
        check_segment(id.as_str())?;
        self.read_document(collection, id)
    }

    fn create_document(&self, collection: &str, fields: Fields) -> Result<DocId, StoreError> {
        check_segment(collection)?;
        let id = new_doc_id();
        let body = encode_body(&fields)?;
        repository::insert_document(
            &self.conn(),
            collection,
            id.as_str(),
            &body,
            Utc::now().timestamp(),
        )?;
        debug!("[DB] Created {}", doc_path(collection, &id));
        self.publish(collection, &id);
        Ok(id)
    }

    fn update_document(
        &self,
        collection: &str,
        id: &DocId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        check_segment(collection)?;
        check_segment(id.as_str())?;
        {
            let conn = self.conn();
            let path = doc_path(collection, id);
            let body = repository::find_document(&conn, collection, id.as_str())?
                .ok_or_else(|| StoreError::NotFound(path.clone()))?;
            let mut merged = parse_body(&path, &body)?;
            for (key, value) in fields {
                merged.insert(key, value);
            }
            let changed = repository::replace_document(
                &conn,
                collection,
                id.as_str(),
                &encode_body(&merged)?,
                Utc::now().timestamp(),
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(path));
            }
            debug!("[DB] Merged update into {}", path);
        }
        self.publish(collection, id);
        Ok(())
    }
}
