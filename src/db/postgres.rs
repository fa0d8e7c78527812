//! Postgres-backed document store.
//!
//! Records and clients are kept as JSONB documents so that loosely typed
//! fields survive intact and are interpreted by `WasteRecord::from_document`.
//! Expected tables live in `sql/schema.sql`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;

use super::source::{ClientDirectory, RecordSource, SourceError};
use crate::report::model::WasteRecord;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordSource for PgDocumentStore {
    async fn fetch_records(&self, cliente_ids: &[String]) -> Result<Vec<WasteRecord>, SourceError> {
        if cliente_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(String, Value)> = sqlx::query_as(
            "SELECT cliente_id, data FROM waste_records WHERE cliente_id = ANY($1) ORDER BY created_at",
        )
        .bind(cliente_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(cliente_id, data)| {
                let mut record = WasteRecord::from_document(&data);
                if record.cliente_id.is_empty() {
                    record.cliente_id = cliente_id;
                }
                record
            })
            .collect())
    }
}

#[async_trait]
impl ClientDirectory for PgDocumentStore {
    async fn display_names(
        &self,
        cliente_ids: &[String],
    ) -> Result<HashMap<String, String>, SourceError> {
        if cliente_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, Option<String>)> =
            sqlx::query_as("SELECT id, data->>'nome' FROM clientes WHERE id = ANY($1)")
                .bind(cliente_ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, nome)| nome.map(|nome| (id, nome)))
            .collect())
    }
}
