//! Period filtering and category aggregation.
//!
//! Everything here is pure: the same records and filter always produce the
//! same statistics, so report requests can share nothing and need no locks.

use chrono::{DateTime, Datelike, FixedOffset};

use super::model::{PeriodFilter, ReportStatistics, WasteCategory, WasteRecord};

/// Label substrings in match priority order. The first hit decides the category.
const CATEGORY_PATTERNS: [(&str, WasteCategory); 3] = [
    ("orgânico", WasteCategory::Organic),
    ("reciclável", WasteCategory::Recyclable),
    ("rejeito", WasteCategory::Reject),
];

/// Classify a free-text waste label, case-insensitively.
pub fn classify(waste_type: &str) -> Option<WasteCategory> {
    let folded = waste_type.to_lowercase();
    CATEGORY_PATTERNS
        .iter()
        .find(|(pattern, _)| folded.contains(pattern))
        .map(|(_, category)| *category)
}

/// Calendar `(year, month)` of a record at the given offset, month being 1-12.
pub fn record_period(record: &WasteRecord, offset: &FixedOffset) -> Option<(i32, u32)> {
    let date = DateTime::from_timestamp_millis(record.timestamp?)?.with_timezone(offset);
    Some((date.year(), date.month()))
}

/// Keep the records whose date falls in one of the selected years and months.
///
/// Input order is preserved. Records without a usable timestamp never match.
pub fn filter_by_period<'a>(
    records: &'a [WasteRecord],
    period: &PeriodFilter,
) -> Vec<&'a WasteRecord> {
    records
        .iter()
        .filter(|record| {
            record_period(record, &period.offset)
                .map(|(year, month)| period.contains(year, month))
                .unwrap_or(false)
        })
        .collect()
}

/// Sum weights overall and per category, then derive percentages of the total.
pub fn aggregate<'a, I>(records: I) -> ReportStatistics
where
    I: IntoIterator<Item = &'a WasteRecord>,
{
    let mut stats = ReportStatistics::default();

    for record in records {
        stats.record_count += 1;
        stats.total_kg += record.peso;
        if let Some(category) = classify(&record.waste_type) {
            stats.category_mut(category).kg += record.peso;
        }
    }

    let total = stats.total_kg;
    for category in WasteCategory::ALL {
        let entry = stats.category_mut(category);
        entry.percent = if total > 0.0 {
            entry.kg / total * 100.0
        } else {
            0.0
        };
    }

    stats
}

/// Filter then aggregate in one call.
pub fn compute_statistics(records: &[WasteRecord], period: &PeriodFilter) -> ReportStatistics {
    aggregate(filter_by_period(records, period))
}
