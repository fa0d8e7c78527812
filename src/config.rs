//! Process configuration read from the environment (and `.env`).

use chrono::FixedOffset;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::render::common::get_static_dir;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TEMPLATE: &str = "relatorio_residuos.typ";
const DEFAULT_SIGNED_URL_EXPIRES_SECS: u64 = 15 * 60;
const DEFAULT_TYPST_BINARY: &str = "typst";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Empty means any origin is accepted.
    pub cors_allowed_origins: Vec<String>,
    pub template_dir: PathBuf,
    pub template_name: String,
    pub typst_binary: String,
    /// Offset used to derive record dates and the report generation date.
    pub timezone: FixedOffset,
    pub signed_url_expires_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let offset_minutes: i32 = parse_var("REPORT_TIMEZONE_OFFSET_MINUTES", 0)?;
        let timezone = FixedOffset::east_opt(offset_minutes * 60).ok_or(ConfigError::Invalid {
            name: "REPORT_TIMEZONE_OFFSET_MINUTES",
            value: offset_minutes.to_string(),
        })?;

        Ok(Self {
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_var("PORT", DEFAULT_PORT)?,
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
            template_dir: env::var("REPORT_TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| get_static_dir()),
            template_name: env::var("REPORT_TEMPLATE_NAME")
                .unwrap_or_else(|_| DEFAULT_TEMPLATE.to_string()),
            typst_binary: env::var("TYPST_BINARY")
                .unwrap_or_else(|_| DEFAULT_TYPST_BINARY.to_string()),
            timezone,
            signed_url_expires_secs: parse_var(
                "SIGNED_URL_EXPIRES_SECS",
                DEFAULT_SIGNED_URL_EXPIRES_SECS,
            )?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
