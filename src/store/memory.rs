// src/store/memory.rs

use super::{
    check_segment, doc_path, new_doc_id, CollectionFeed, CollectionSnapshot, Document,
    DocumentFeed, DocumentSnapshot, DocumentStore, Fields, StoreError, StoreWatchers,
};
use crate::models::DocId;
use crate::watch::Subscription;
use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

type Collections = BTreeMap<String, BTreeMap<DocId, Fields>>;

/// In-process store. Also counts writes and can deny access to a collection,
/// which is how tests exercise failure and "no writes" paths.
pub struct MemoryStore {
    collections: Mutex<Collections>,
    denied: Mutex<HashSet<String>>,
    writes: AtomicUsize,
    watchers: StoreWatchers,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            collections: Mutex::new(BTreeMap::new()),
            denied: Mutex::new(HashSet::new()),
            writes: AtomicUsize::new(0),
            watchers: StoreWatchers::new(),
        }
    }

    /// Number of create/update calls that reached the store.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.watcher_count()
    }

    /// Rejects every later operation on `collection` and fails its live watches.
    pub fn deny(&self, collection: &str) {
        self.denied_set().insert(collection.to_string());
        self.watchers
            .fail_collection(collection, StoreError::PermissionDenied);
    }

    fn check_access(&self, collection: &str) -> Result<(), StoreError> {
        check_segment(collection)?;
        if self.denied_set().contains(collection) {
            return Err(StoreError::PermissionDenied);
        }
        Ok(())
    }

    fn denied_set(&self) -> MutexGuard<'_, HashSet<String>> {
        self.denied.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn data(&self) -> MutexGuard<'_, Collections> {
        self.collections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_collection(&self, collection: &str) -> CollectionSnapshot {
        let docs = self
            .data()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        CollectionSnapshot { docs }
    }

    fn read_document(&self, collection: &str, id: &DocId) -> DocumentSnapshot {
        let data = self
            .data()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned();
        DocumentSnapshot {
            id: id.clone(),
            data,
        }
    }

    fn publish(&self, collection: &str, id: &DocId) {
        self.watchers
            .collection_changed(collection, Ok(self.read_collection(collection)));
        self.watchers
            .document_changed(collection, id, Ok(self.read_document(collection, id)));
    }
}

impl DocumentStore for MemoryStore {
    fn watch_collection(&self, collection: &str) -> CollectionFeed {
        if let Err(e) = self.check_access(collection) {
            return Subscription::once(Err(e));
        }
        self.watchers
            .watch_collection(collection, Ok(self.read_collection(collection)))
    }

    fn watch_document(&self, collection: &str, id: &DocId) -> DocumentFeed {
        if let Err(e) = self
            .check_access(collection)
            .and_then(|_| check_segment(id.as_str()))
        {
            return Subscription::once(Err(e));
        }
        self.watchers
            .watch_document(collection, id, Ok(self.read_document(collection, id)))
    }

    fn get_document(&self, collection: &str, id: &DocId) -> Result<DocumentSnapshot, StoreError> {
        self.check_access(collection)?;
        check_segment(id.as_str())?;
        Ok(self.read_document(collection, id))
    }

    fn create_document(&self, collection: &str, fields: Fields) -> Result<DocId, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_access(collection)?;
        let id = new_doc_id();
        self.data()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
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
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_access(collection)?;
        check_segment(id.as_str())?;
        {
            let mut data = self.data();
            let doc = data
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound(doc_path(collection, id)))?;
            for (key, value) in fields {
                doc.insert(key, value);
            }
        }
        debug!("[DB] Updated {}", doc_path(collection, id));
        self.publish(collection, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::to_fields;
    use serde_json::json;

    fn fields(v: serde_json::Value) -> Fields {
        to_fields(&v).unwrap()
    }

    #[test]
    fn create_then_get() {
        let store = MemoryStore::new();
        let id = store
            .create_document("problems", fields(json!({"problemName": "A"})))
            .unwrap();
        let snap = store.get_document("problems", &id).unwrap();
        assert_eq!(snap.data.unwrap()["problemName"], json!("A"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn update_merges_top_level_fields() {
        let store = MemoryStore::new();
        let id = store
            .create_document("problems", fields(json!({"a": 1, "b": 2})))
            .unwrap();
        store
            .update_document("problems", &id, fields(json!({"b": 3, "c": 4})))
            .unwrap();
        let data = store.get_document("problems", &id).unwrap().data.unwrap();
        assert_eq!(data["a"], json!(1));
        assert_eq!(data["b"], json!(3));
        assert_eq!(data["c"], json!(4));
    }

    #[test]
    fn update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update_document("problems", &DocId::new("nope"), Fields::new())
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("problems/nope".to_string()));
    }

    #[test]
    fn collection_watch_sees_writes() {
        let store = MemoryStore::new();
        let feed = store.watch_collection("problems");
        assert_eq!(feed.latest().unwrap().unwrap().docs.len(), 0);

        store
            .create_document("problems", fields(json!({"x": 1})))
            .unwrap();
        store
            .create_document("problems_meta", fields(json!({"y": 1})))
            .unwrap();
        let snap = feed.latest().unwrap().unwrap();
        assert_eq!(snap.docs.len(), 1);
    }

    #[test]
    fn document_watch_sees_updates() {
        let store = MemoryStore::new();
        let id = store
            .create_document("problems", fields(json!({"x": 1})))
            .unwrap();
        let feed = store.watch_document("problems", &id);
        feed.latest();
        store
            .update_document("problems", &id, fields(json!({"x": 2})))
            .unwrap();
        let snap = feed.latest().unwrap().unwrap();
        assert_eq!(snap.data.unwrap()["x"], json!(2));
    }

    #[test]
    fn deny_fails_live_watches_and_later_calls() {
        let store = MemoryStore::new();
        let feed = store.watch_collection("problems");
        feed.latest();
        store.deny("problems");
        assert_eq!(feed.latest(), Some(Err(StoreError::PermissionDenied)));

        let late = store.watch_collection("problems");
        assert_eq!(late.latest(), Some(Err(StoreError::PermissionDenied)));
        assert!(store
            .create_document("problems", Fields::new())
            .is_err());
    }

    #[test]
    fn dropped_feeds_are_released() {
        let store = MemoryStore::new();
        let a = store.watch_collection("problems");
        let b = store.watch_document("problems", &DocId::new("x"));
        assert_eq!(store.watcher_count(), 2);
        drop(a);
        drop(b);
        assert_eq!(store.watcher_count(), 0);
    }
}
