//! Waste report generation.
//!
//! - `model` - records, categories, statistics
//! - `aggregation` - period filter and category totals (pure)
//! - `request` - HTTP payload and validation
//! - `presentation` - display formatting for templates
//! - `service` - end-to-end orchestration
//! - `handlers` - actix routes

pub mod aggregation;
pub mod error;
pub mod handlers;
pub mod model;
pub mod presentation;
pub mod request;
pub mod service;

pub use aggregation::{aggregate, classify, compute_statistics, filter_by_period};
pub use error::ReportError;
pub use model::{CategoryTotal, PeriodFilter, ReportStatistics, WasteCategory, WasteRecord};
pub use request::{GenerateReportRequest, ReportFilter};
