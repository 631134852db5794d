//! Document store and blob store seams
//!
//! All persistence belongs to an external backend: a schema-free document
//! database holding the `Fabrics`, `Machines` and `Orders` collections, and an
//! object store holding uploaded images. The traits here are the only way the
//! catalog and import code reach either one.

mod blob;
mod memory;
#[cfg(feature = "sqlx")]
mod sqlite;

pub use blob::{blob_path_from_url, download_url_for, FsBlobStore, MemoryBlobStore};
pub use memory::MemoryDocumentStore;
#[cfg(feature = "sqlx")]
pub use sqlite::SqliteDocumentStore;

use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Named collections in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Fabrics,
    Machines,
    Orders,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fabrics => "Fabrics",
            Self::Machines => "Machines",
            Self::Orders => "Orders",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field change applied by [`DocumentStore::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Replace the field
    Set(String, Value),
    /// Append each value not already present in the array field
    ArrayUnion(String, Vec<Value>),
    /// Drop every array entry equal to one of the values
    ArrayRemove(String, Vec<Value>),
}

impl FieldUpdate {
    pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Set(field.into(), value.into())
    }

    pub fn array_union<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::ArrayUnion(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn array_remove<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::ArrayRemove(field.into(), values.into_iter().map(Into::into).collect())
    }
}

/// Schema-free document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its generated id
    async fn add(&self, collection: Collection, document: Value) -> Result<String>;

    /// Fetch one document
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>>;

    /// All documents of a collection in insertion order
    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>>;

    /// Apply field updates to an existing document
    ///
    /// Fails with [`Error::NotFound`] when the document does not exist.
    async fn update(&self, collection: Collection, id: &str, updates: Vec<FieldUpdate>)
        -> Result<()>;
}

/// Object storage addressed by path
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes at `path`, replacing anything already there
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Resolve the download reference for a stored object
    async fn download_url(&self, path: &str) -> Result<String>;

    /// Remove a stored object
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Apply updates to a document body in place
pub fn apply_updates(document: &mut Map<String, Value>, updates: &[FieldUpdate]) {
    for update in updates {
        match update {
            FieldUpdate::Set(field, value) => {
                document.insert(field.clone(), value.clone());
            }
            FieldUpdate::ArrayUnion(field, values) => {
                with_array_field(document, field, |array| {
                    for value in values {
                        if !array.contains(value) {
                            array.push(value.clone());
                        }
                    }
                });
            }
            FieldUpdate::ArrayRemove(field, values) => {
                with_array_field(document, field, |array| {
                    array.retain(|entry| !values.contains(entry));
                });
            }
        }
    }
}

/// Edit an array-valued field; a missing or non-array value starts as `[]`
fn with_array_field<F>(document: &mut Map<String, Value>, field: &str, edit: F)
where
    F: FnOnce(&mut Vec<Value>),
{
    let mut array = match document.remove(field) {
        Some(Value::Array(array)) => array,
        _ => Vec::new(),
    };
    edit(&mut array);
    document.insert(field.to_string(), Value::Array(array));
}

/// Documents must be JSON objects
fn into_object(document: Value) -> Result<Map<String, Value>> {
    match document {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidInput(format!(
            "Documents must be objects, got {}",
            other
        ))),
    }
}

/// Serialize and insert a typed record
pub async fn add_record<S, T>(store: &S, collection: Collection, record: &T) -> Result<String>
where
    S: DocumentStore + ?Sized,
    T: Serialize + Sync,
{
    store.add(collection, serde_json::to_value(record)?).await
}

/// Fetch and deserialize a typed record
pub async fn get_record<S, T>(store: &S, collection: Collection, id: &str) -> Result<Option<T>>
where
    S: DocumentStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(collection, id).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// List and deserialize a collection
pub async fn list_records<S, T>(store: &S, collection: Collection) -> Result<Vec<crate::Stored<T>>>
where
    S: DocumentStore + ?Sized,
    T: DeserializeOwned,
{
    store
        .list(collection)
        .await?
        .into_iter()
        .map(|(id, value)| Ok(crate::Stored::new(id, serde_json::from_value(value)?)))
        .collect()
}
