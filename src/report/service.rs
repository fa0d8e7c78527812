//! Report orchestration: validate, fetch, aggregate, render, deliver.

use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, error, info, warn};
use uuid::Uuid;

use super::aggregation::compute_statistics;
use super::error::ReportError;
use super::model::ReportStatistics;
use super::presentation::ReportView;
use super::request::GenerateReportRequest;
use crate::db::{client_label, AppState};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A delivered report.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub download_url: String,
    pub file_name: String,
    pub object_path: String,
    pub expires_in: u64,
    pub statistics: ReportStatistics,
}

/// Storage key for a rendered report: `reports/YYYY/MM/<uuid>-<file>`.
pub fn object_path(generated_at: &DateTime<FixedOffset>, file_name: &str) -> String {
    format!(
        "reports/{}/{}-{}",
        generated_at.format("%Y/%m"),
        Uuid::new_v4().simple(),
        file_name
    )
}

pub async fn generate_report(
    state: &AppState,
    request: GenerateReportRequest,
) -> Result<GeneratedReport, ReportError> {
    let filter = request.into_filter()?;
    let settings = &state.settings;

    info!(
        "Generating report for {} client(s), {} year(s), {} month(s)",
        filter.cliente_ids.len(),
        filter.years.len(),
        filter.months.len()
    );

    let records = state.records.fetch_records(&filter.cliente_ids).await?;
    let statistics = compute_statistics(&records, &filter.period(settings.timezone));
    info!(
        "{} of {} fetched records matched the period ({:.2} kg)",
        statistics.record_count,
        records.len(),
        statistics.total_kg
    );

    let names = state.clients.display_names(&filter.cliente_ids).await?;
    let label = client_label(&filter.cliente_ids, &names);

    let generated_at = Utc::now().with_timezone(&settings.timezone);
    let view = ReportView::new(&statistics, label, &filter, &generated_at);

    let renderer = state.renderer.clone();
    let template_name = settings.template_name.clone();
    let document = tokio::task::spawn_blocking(move || renderer.render(&template_name, &view))
        .await
        .map_err(|e| ReportError::Worker(e.to_string()))??;
    debug!("Rendered {} ({} bytes)", document.filename, document.pdf.len());

    let path = object_path(&generated_at, &document.filename);
    state
        .storage
        .upload_file(&path, &document.pdf, PDF_CONTENT_TYPE)
        .await
        .map_err(|e| {
            error!("Failed to upload report {}: {}", path, e);
            e
        })?;

    let download_url = match state
        .storage
        .create_signed_url(&path, settings.signed_url_expires_secs)
        .await
    {
        Ok(url) => url,
        Err(e) => {
            error!("Failed to sign report {}: {}", path, e);
            if let Err(cleanup) = state.storage.delete_file(&path).await {
                warn!("Failed to remove unsigned report {}: {}", path, cleanup);
            }
            return Err(e.into());
        }
    };

    info!("Report {} delivered", path);

    Ok(GeneratedReport {
        download_url,
        file_name: document.filename,
        object_path: path,
        expires_in: settings.signed_url_expires_secs,
        statistics,
    })
}
