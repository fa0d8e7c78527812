use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod db;
pub mod health;
pub mod render;
pub mod report;
pub mod storage;

pub use crate::db::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("BadGateway", message)
    }

    pub fn service_unavailable(message: &str) -> Self {
        Self::new("ServiceUnavailable", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::report::handlers::generate_report,
        crate::health::health_check,
    ),
    components(
        schemas(
            report::request::GenerateReportRequest,
            report::handlers::ReportResponse,
            report::model::ReportStatistics,
            report::model::CategoryTotal,
            health::HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Report Service", description = "Waste report generation."),
        (name = "Health", description = "Liveness probe.")
    )
)]
pub struct ApiDoc;

/// Routes shared by the server and the integration tests.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::config)
        .service(web::scope("/api").configure(report::handlers::config));
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        log::warn!("CORS_ALLOWED_ORIGINS not set, accepting any origin");
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::AppConfig::from_env().context("invalid configuration")?;
    let supabase_config =
        storage::SupabaseConfig::from_env().context("invalid storage configuration")?;

    let app_state = match AppState::new_with_config(&config, supabase_config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to initialise services. Check DATABASE_URL and the Supabase settings. Error: {}",
                e
            );
            return Err(anyhow!("startup failed: {}", e));
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("waste_report_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    let bind = (config.host.clone(), config.port);
    let origins = config.cors_allowed_origins.clone();
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .wrap(build_cors(&origins))
            .app_data(app_state.clone())
            .configure(configure_app)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
