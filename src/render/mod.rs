//! Render module - turns report data into PDF documents through Typst templates.
//!
//! - `engine` - writes Typst source to a temp dir and runs the compiler
//! - `typst_report` - loads a named template and injects report data
//! - `common` - escaping, filename and path helpers

pub mod common;
pub mod engine;
pub mod typst_report;

pub use engine::TypstRenderEngine;
pub use typst_report::TypstReportRenderer;

use thiserror::Error;

use crate::report::presentation::ReportView;

/// Errors that can occur during report rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid template name: {0}")]
    TemplateName(String),
    #[error("failed to load Typst template {name}: {source}")]
    TemplateIo {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {code}: {stderr}")]
    TypstExit { code: i32, stderr: String },
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Result of a successful render.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
}

/// Renders report data with a named template.
pub trait ReportRenderer {
    fn render(&self, template_name: &str, view: &ReportView)
        -> Result<RenderedDocument, RenderError>;
}
