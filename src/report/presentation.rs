//! Presentation boundary: plain numbers in, display strings out.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::model::{CategoryTotal, ReportStatistics};
use super::request::ReportFilter;

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub fn format_kg(value: f64) -> String {
    format!("{:.2} Kg", value)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// "dd/mm/YYYY HH:MM"
pub fn format_generation_date(at: &DateTime<FixedOffset>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// Portuguese month name for a 1-12 month.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
}

/// Human label for the selected period, e.g. "Janeiro, Fevereiro de 2024".
pub fn describe_period<'a, Y, M>(years: Y, months: M) -> String
where
    Y: IntoIterator<Item = &'a i32>,
    M: IntoIterator<Item = &'a u32>,
{
    let months: Vec<u32> = months.into_iter().copied().collect();
    let years = years
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let month_label = if months.len() == MONTH_NAMES.len() {
        "Janeiro a Dezembro".to_string()
    } else {
        months
            .iter()
            .filter_map(|m| month_name(*m))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!("{} de {}", month_label, years)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub kg: String,
    pub percent: String,
}

impl From<&CategoryTotal> for CategoryView {
    fn from(total: &CategoryTotal) -> Self {
        Self {
            kg: format_kg(total.kg),
            percent: format_percent(total.percent),
        }
    }
}

/// Template data for a rendered report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub cliente_nome: String,
    pub periodo: String,
    pub data_geracao: String,
    pub total_registros: usize,
    pub peso_total: String,
    pub organico: CategoryView,
    pub reciclavel: CategoryView,
    pub rejeito: CategoryView,
}

impl ReportView {
    pub fn new(
        stats: &ReportStatistics,
        cliente_nome: impl Into<String>,
        filter: &ReportFilter,
        generated_at: &DateTime<FixedOffset>,
    ) -> Self {
        Self {
            cliente_nome: cliente_nome.into(),
            periodo: describe_period(&filter.years, &filter.months),
            data_geracao: format_generation_date(generated_at),
            total_registros: stats.record_count,
            peso_total: format_kg(stats.total_kg),
            organico: CategoryView::from(&stats.organic),
            reciclavel: CategoryView::from(&stats.recyclable),
            rejeito: CategoryView::from(&stats.reject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    #[test]
    fn test_number_formats() {
        assert_eq!(format_kg(12.346), "12.35 Kg");
        assert_eq!(format_kg(0.0), "0.00 Kg");
        assert_eq!(format_percent(33.3333), "33.33%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), Some("Janeiro"));
        assert_eq!(month_name(12), Some("Dezembro"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_describe_period() {
        let years = BTreeSet::from([2023, 2024]);
        let months = BTreeSet::from([1, 3]);
        assert_eq!(describe_period(&years, &months), "Janeiro, Março de 2023, 2024");

        let all: BTreeSet<u32> = (1..=12).collect();
        assert_eq!(
            describe_period(&BTreeSet::from([2024]), &all),
            "Janeiro a Dezembro de 2024"
        );
    }

    #[test]
    fn test_view_from_statistics() {
        let stats = ReportStatistics {
            total_kg: 30.0,
            organic: CategoryTotal { kg: 10.0, percent: 100.0 / 3.0 },
            recyclable: CategoryTotal { kg: 20.0, percent: 200.0 / 3.0 },
            reject: CategoryTotal::default(),
            record_count: 2,
        };
        let filter = ReportFilter {
            cliente_ids: vec!["a".to_string()],
            years: BTreeSet::from([2024]),
            months: BTreeSet::from([1]),
        };
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2024, 2, 5, 9, 7, 0).unwrap();

        let view = ReportView::new(&stats, "Hotel Atlântico", &filter, &at);
        assert_eq!(view.peso_total, "30.00 Kg");
        assert_eq!(view.organico.percent, "33.33%");
        assert_eq!(view.reciclavel.kg, "20.00 Kg");
        assert_eq!(view.rejeito.percent, "0.00%");
        assert_eq!(view.periodo, "Janeiro de 2024");
        assert_eq!(view.data_geracao, "05/02/2024 09:07");
        assert_eq!(view.total_registros, 2);
    }
}
