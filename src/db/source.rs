//! Data-source seams used by report generation.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::report::model::WasteRecord;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the waste records of a set of clients. Date filtering is not its job.
#[async_trait]
pub trait RecordSource {
    async fn fetch_records(&self, cliente_ids: &[String]) -> Result<Vec<WasteRecord>, SourceError>;
}

/// Maps client ids to display names. Unknown ids are simply absent from the map.
#[async_trait]
pub trait ClientDirectory {
    async fn display_names(
        &self,
        cliente_ids: &[String],
    ) -> Result<HashMap<String, String>, SourceError>;
}

/// Join display names in request order, falling back to the raw id.
pub fn client_label(cliente_ids: &[String], names: &HashMap<String, String>) -> String {
    cliente_ids
        .iter()
        .map(|id| {
            names
                .get(id)
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .unwrap_or(id.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
