//! Database module - AppState and data sources
//!
//! - `source` - record source / client directory traits
//! - `postgres` - JSONB document store implementing both

pub mod postgres;
pub mod source;

pub use postgres::PgDocumentStore;
pub use source::{client_label, ClientDirectory, RecordSource, SourceError};

use chrono::FixedOffset;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::render::{ReportRenderer, TypstRenderEngine, TypstReportRenderer};
use crate::storage::{ObjectStorage, SupabaseConfig, SupabaseStorage};

/// Per-process report settings shared by every request.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub template_name: String,
    pub timezone: FixedOffset,
    pub signed_url_expires_secs: u64,
}

impl ReportSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            template_name: config.template_name.clone(),
            timezone: config.timezone,
            signed_url_expires_secs: config.signed_url_expires_secs,
        }
    }
}

/// Collaborators built once at startup and shared by reference with every handler.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordSource + Send + Sync>,
    pub clients: Arc<dyn ClientDirectory + Send + Sync>,
    pub renderer: Arc<dyn ReportRenderer + Send + Sync>,
    pub storage: Arc<dyn ObjectStorage + Send + Sync>,
    pub settings: ReportSettings,
}

impl AppState {
    pub async fn new_with_config(
        config: &AppConfig,
        supabase_config: SupabaseConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&config.database_url)
            .await?;
        let store = Arc::new(PgDocumentStore::new(pool));

        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .timeout(Duration::from_secs(60))
            .user_agent("waste-report-server/1.0")
            .build()?;

        let storage = Arc::new(SupabaseStorage::new(supabase_config, http_client));
        let renderer = Arc::new(TypstReportRenderer::new(
            config.template_dir.clone(),
            TypstRenderEngine::new(config.typst_binary.clone()),
        ));

        Ok(Self::new_with_services(
            store.clone(),
            store,
            renderer,
            storage,
            ReportSettings::from_config(config),
        ))
    }

    pub fn new_with_services(
        records: Arc<dyn RecordSource + Send + Sync>,
        clients: Arc<dyn ClientDirectory + Send + Sync>,
        renderer: Arc<dyn ReportRenderer + Send + Sync>,
        storage: Arc<dyn ObjectStorage + Send + Sync>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            records,
            clients,
            renderer,
            storage,
            settings,
        }
    }
}
