//! Report request payload and its validation.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use utoipa::ToSchema;

use super::model::PeriodFilter;

const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 9999;

/// Body of `POST /api/generate-report`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    #[serde(default)]
    #[schema(example = json!(["cliente-123"]))]
    pub selected_cliente_ids: Vec<String>,
    #[serde(default)]
    #[schema(example = json!([2024]))]
    pub selected_years: Vec<i32>,
    /// Zero-based month indices (0 = January).
    #[serde(default)]
    #[schema(example = json!([0, 1, 2]))]
    pub selected_months: Vec<i64>,
}

/// A validated request: deduplicated clients, years, and 1-12 months.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFilter {
    pub cliente_ids: Vec<String>,
    pub years: BTreeSet<i32>,
    pub months: BTreeSet<u32>,
}

impl ReportFilter {
    pub fn period(&self, offset: FixedOffset) -> PeriodFilter {
        PeriodFilter::new(self.years.iter().copied(), self.months.iter().copied(), offset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

/// All problems found in a request, reported together.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

impl GenerateReportRequest {
    /// Check the three selections and normalise them into a [`ReportFilter`].
    pub fn into_filter(self) -> Result<ReportFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let mut cliente_ids: Vec<String> = Vec::new();
        if self.selected_cliente_ids.is_empty() {
            errors.add(ValidationError::new(
                "selectedClienteIds",
                "Selecione pelo menos um cliente.",
            ));
        }
        for id in self.selected_cliente_ids {
            let trimmed = id.trim();
            if trimmed.is_empty() {
                errors.add(ValidationError::new(
                    "selectedClienteIds",
                    "Identificador de cliente vazio.",
                ));
            } else if !cliente_ids.iter().any(|existing| existing == trimmed) {
                cliente_ids.push(trimmed.to_string());
            }
        }

        if self.selected_years.is_empty() {
            errors.add(ValidationError::new(
                "selectedYears",
                "Selecione pelo menos um ano.",
            ));
        }
        let mut years = BTreeSet::new();
        for year in self.selected_years {
            if (MIN_YEAR..=MAX_YEAR).contains(&year) {
                years.insert(year);
            } else {
                errors.add(ValidationError::new(
                    "selectedYears",
                    format!("Ano inválido: {}.", year),
                ));
            }
        }

        if self.selected_months.is_empty() {
            errors.add(ValidationError::new(
                "selectedMonths",
                "Selecione pelo menos um mês.",
            ));
        }
        let mut months = BTreeSet::new();
        for month in self.selected_months {
            if (0..12).contains(&month) {
                months.insert(month as u32 + 1);
            } else {
                errors.add(ValidationError::new(
                    "selectedMonths",
                    format!("Mês inválido: {} (esperado 0 a 11).", month),
                ));
            }
        }

        if errors.is_empty() {
            Ok(ReportFilter {
                cliente_ids,
                years,
                months,
            })
        } else {
            Err(errors)
        }
    }
}
