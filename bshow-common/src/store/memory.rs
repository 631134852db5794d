//! In-memory document store

use super::{apply_updates, into_object, Collection, DocumentStore, FieldUpdate};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

type Documents = Vec<(String, Map<String, Value>)>;

/// Document store held entirely in memory, insertion ordered per collection
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Documents>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document under a caller-chosen id
    pub async fn insert_with_id(
        &self,
        collection: Collection,
        id: impl Into<String>,
        document: Value,
    ) -> Result<()> {
        let id = id.into();
        let body = into_object(document)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        match docs.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => *existing = body,
            None => docs.push((id, body)),
        }
        Ok(())
    }

    /// Number of documents in a collection
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add(&self, collection: Collection, document: Value) -> Result<String> {
        let body = into_object(document)?;
        let id = Uuid::new_v4().to_string();
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push((id.clone(), body));
        Ok(id)
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(_, body)| Value::Object(body.clone()))
        }))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, body)| (id.clone(), Value::Object(body.clone())))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        updates: Vec<FieldUpdate>,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let body = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .map(|(_, body)| body)
            .ok_or_else(|| Error::NotFound(format!("{}/{}", collection, id)))?;
        apply_updates(body, &updates);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_then_get() {
        let store = MemoryDocumentStore::new();
        let id = store
            .add(Collection::Orders, json!({"customer": "Nour", "fabric": "f1", "amount": 40}))
            .await
            .unwrap();

        let doc = store.get(Collection::Orders, &id).await.unwrap().unwrap();
        assert_eq!(doc["customer"], "Nour");
        assert!(store.get(Collection::Fabrics, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryDocumentStore::new();
        let a = store.add(Collection::Machines, json!({"Name": "A"})).await.unwrap();
        let b = store.add(Collection::Machines, json!({"Name": "B"})).await.unwrap();
        let c = store.add(Collection::Machines, json!({"Name": "C"})).await.unwrap();

        let ids: Vec<String> = store
            .list(Collection::Machines)
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let result = store
            .update(Collection::Fabrics, "nope", vec![FieldUpdate::set("name", "x")])
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_insert_with_id_replaces() {
        let store = MemoryDocumentStore::new();
        store
            .insert_with_id(Collection::Fabrics, "f1", json!({"name": "old"}))
            .await
            .unwrap();
        store
            .insert_with_id(Collection::Fabrics, "f1", json!({"name": "new"}))
            .await
            .unwrap();

        assert_eq!(store.len(Collection::Fabrics).await, 1);
        let doc = store.get(Collection::Fabrics, "f1").await.unwrap().unwrap();
        assert_eq!(doc["name"], "new");
    }
}
