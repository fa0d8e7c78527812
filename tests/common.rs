#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use waste_report_server::db::{
    AppState, ClientDirectory, RecordSource, ReportSettings, SourceError,
};
use waste_report_server::render::{RenderError, RenderedDocument, ReportRenderer};
use waste_report_server::report::presentation::ReportView;
use waste_report_server::report::WasteRecord;
use waste_report_server::storage::{ObjectStorage, StorageError};

pub fn millis(year: i32, month: u32, day: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .unwrap()
        .timestamp_millis()
}

pub fn record(cliente_id: &str, year: i32, month: u32, peso: f64, waste_type: &str) -> WasteRecord {
    WasteRecord::new(cliente_id, Some(millis(year, month, 10)), peso, waste_type)
}

/// In-memory record source keyed by client id.
pub struct MockRecordSource {
    records: Vec<WasteRecord>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl MockRecordSource {
    pub fn new(records: Vec<WasteRecord>) -> Self {
        Self {
            records,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn fetch_records(&self, cliente_ids: &[String]) -> Result<Vec<WasteRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::Unavailable("connection refused".to_string()));
        }
        Ok(self
            .records
            .iter()
            .filter(|r| cliente_ids.contains(&r.cliente_id))
            .cloned()
            .collect())
    }
}

pub struct MockClientDirectory {
    names: HashMap<String, String>,
}

impl MockClientDirectory {
    pub fn new(names: &[(&str, &str)]) -> Self {
        Self {
            names: names
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl ClientDirectory for MockClientDirectory {
    async fn display_names(
        &self,
        cliente_ids: &[String],
    ) -> Result<HashMap<String, String>, SourceError> {
        Ok(self
            .names
            .iter()
            .filter(|(id, _)| cliente_ids.contains(*id))
            .map(|(id, name)| (id.clone(), name.clone()))
            .collect())
    }
}

/// Renderer that records the views it was given and returns a fake PDF.
#[derive(Default)]
pub struct MockRenderer {
    pub views: Mutex<Vec<(String, ReportView)>>,
    pub fail: bool,
}

impl MockRenderer {
    pub fn failing() -> Self {
        Self {
            views: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn last_view(&self) -> Option<ReportView> {
        self.views.lock().unwrap().last().map(|(_, v)| v.clone())
    }
}

impl ReportRenderer for MockRenderer {
    fn render(
        &self,
        template_name: &str,
        view: &ReportView,
    ) -> Result<RenderedDocument, RenderError> {
        self.views
            .lock()
            .unwrap()
            .push((template_name.to_string(), view.clone()));
        if self.fail {
            return Err(RenderError::TypstExit {
                code: 1,
                stderr: "error: unknown variable".to_string(),
            });
        }
        Ok(RenderedDocument {
            filename: "relatorio-teste.pdf".to_string(),
            pdf: b"%PDF-1.7 fake".to_vec(),
        })
    }
}

/// In-memory object storage.
#[derive(Default)]
pub struct MockObjectStorage {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_upload: bool,
    pub fail_sign: bool,
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn upload_file(
        &self,
        path: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<(), StorageError> {
        if self.fail_upload {
            return Err(StorageError::Status {
                status: 403,
                body: "forbidden".to_string(),
            });
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn create_signed_url(
        &self,
        path: &str,
        expires_in_secs: u64,
    ) -> Result<String, StorageError> {
        if self.fail_sign {
            return Err(StorageError::MissingSignedUrl);
        }
        Ok(format!(
            "http://storage.test/{}?token=abc&expires={}",
            path, expires_in_secs
        ))
    }
}

pub fn settings() -> ReportSettings {
    ReportSettings {
        template_name: "relatorio_residuos.typ".to_string(),
        timezone: FixedOffset::east_opt(0).unwrap(),
        signed_url_expires_secs: 600,
    }
}

pub struct Harness {
    pub records: Arc<MockRecordSource>,
    pub renderer: Arc<MockRenderer>,
    pub storage: Arc<MockObjectStorage>,
    pub state: AppState,
}

pub fn harness_with(
    records: MockRecordSource,
    renderer: MockRenderer,
    storage: MockObjectStorage,
) -> Harness {
    let records = Arc::new(records);
    let renderer = Arc::new(renderer);
    let storage = Arc::new(storage);
    let clients = Arc::new(MockClientDirectory::new(&[
        ("hotel-sol", "Hotel Sol"),
        ("pousada-mar", "Pousada Mar"),
    ]));

    let state = AppState::new_with_services(
        records.clone(),
        clients,
        renderer.clone(),
        storage.clone(),
        settings(),
    );

    Harness {
        records,
        renderer,
        storage,
        state,
    }
}

pub fn sample_records() -> Vec<WasteRecord> {
    vec![
        record("hotel-sol", 2024, 1, 10.0, "Orgânico"),
        record("hotel-sol", 2024, 1, 20.0, "Reciclável"),
        record("hotel-sol", 2023, 1, 99.0, "Rejeito"),
        record("pousada-mar", 2024, 1, 5.0, "Rejeito"),
    ]
}

pub fn harness() -> Harness {
    harness_with(
        MockRecordSource::new(sample_records()),
        MockRenderer::default(),
        MockObjectStorage::new(),
    )
}
