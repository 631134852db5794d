//! SQLite-backed document store
//!
//! Every document lives as a JSON body in one `documents` table keyed by
//! (collection, id). Listing order is insertion order via the rowid.

use super::{apply_updates, into_object, Collection, DocumentStore, FieldUpdate};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Document store persisted in a local SQLite file
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Open (creating if needed) the database file and ensure the table exists
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new document database: {}", db_path.display());
        } else {
            info!("Opened existing document database: {}", db_path.display());
        }

        sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
        sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the documents table if missing
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (collection, id)
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_body(body: &str) -> Result<Value> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn add(&self, collection: Collection, document: Value) -> Result<String> {
        let body = Value::Object(into_object(document)?).to_string();
        let id = Uuid::new_v4().to_string();
        let created_at = crate::time::now().to_rfc3339();

        sqlx::query("INSERT INTO documents (collection, id, body, created_at) VALUES (?, ?, ?, ?)")
            .bind(collection.as_str())
            .bind(&id)
            .bind(&body)
            .bind(&created_at)
            .execute(&self.pool)
            .await?;

        debug!(collection = %collection, id = %id, "Document added");
        Ok(id)
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(body,)| parse_body(&body)).transpose()
    }

    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, body FROM documents WHERE collection = ? ORDER BY seq")
                .bind(collection.as_str())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(id, body)| Ok((id, parse_body(&body)?)))
            .collect()
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        updates: Vec<FieldUpdate>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let (body,) = row.ok_or_else(|| Error::NotFound(format!("{}/{}", collection, id)))?;
        let mut document = into_object(parse_body(&body)?)?;
        apply_updates(&mut document, &updates);

        sqlx::query("UPDATE documents SET body = ? WHERE collection = ? AND id = ?")
            .bind(Value::Object(document).to_string())
            .bind(collection.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(collection = %collection, id = %id, "Document updated");
        Ok(())
    }
}
