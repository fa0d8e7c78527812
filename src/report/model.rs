use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use utoipa::ToSchema;

/// A single weighed waste entry as stored in the document database.
///
/// Decoding is total: any missing or malformed field falls back to a neutral
/// value instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", rename_all = "camelCase")]
pub struct WasteRecord {
    pub cliente_id: String,
    /// Milliseconds since the Unix epoch. `None` when the document carries no usable date.
    pub timestamp: Option<i64>,
    /// Weight in kilograms, never negative.
    pub peso: f64,
    pub waste_type: String,
}

impl WasteRecord {
    pub fn new(
        cliente_id: impl Into<String>,
        timestamp: Option<i64>,
        peso: f64,
        waste_type: impl Into<String>,
    ) -> Self {
        Self {
            cliente_id: cliente_id.into(),
            timestamp,
            peso: sanitize_weight(Some(peso)),
            waste_type: waste_type.into(),
        }
    }

    pub fn from_document(doc: &Value) -> Self {
        Self {
            cliente_id: doc
                .get("clienteId")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            timestamp: doc.get("timestamp").and_then(timestamp_millis),
            peso: sanitize_weight(doc.get("peso").and_then(lenient_number)),
            waste_type: doc
                .get("wasteType")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl From<Value> for WasteRecord {
    fn from(doc: Value) -> Self {
        Self::from_document(&doc)
    }
}

fn sanitize_weight(value: Option<f64>) -> f64 {
    match value {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => 0.0,
    }
}

/// Numbers may be stored as JSON numbers or as strings typed by hand ("12,5").
fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
}

/// Accepts epoch milliseconds or a `{seconds, nanoseconds}` timestamp object.
fn timestamp_millis(value: &Value) -> Option<i64> {
    let millis = match value {
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(lenient_number)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(lenient_number)
                .unwrap_or(0.0);
            seconds * 1000.0 + nanos / 1_000_000.0
        }
        other => lenient_number(other)?,
    };
    millis.is_finite().then(|| millis as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WasteCategory {
    Organic,
    Recyclable,
    Reject,
}

impl WasteCategory {
    pub const ALL: [WasteCategory; 3] = [
        WasteCategory::Organic,
        WasteCategory::Recyclable,
        WasteCategory::Reject,
    ];
}

/// Year/month window applied to record dates.
#[derive(Debug, Clone)]
pub struct PeriodFilter {
    pub years: BTreeSet<i32>,
    /// Calendar months, 1-12.
    pub months: BTreeSet<u32>,
    /// Offset used to turn a timestamp into a calendar date.
    pub offset: FixedOffset,
}

impl PeriodFilter {
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        months: impl IntoIterator<Item = u32>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            years: years.into_iter().collect(),
            months: months.into_iter().collect(),
            offset,
        }
    }

    pub fn contains(&self, year: i32, month: u32) -> bool {
        self.years.contains(&year) && self.months.contains(&month)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct CategoryTotal {
    pub kg: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub total_kg: f64,
    pub organic: CategoryTotal,
    pub recyclable: CategoryTotal,
    pub reject: CategoryTotal,
    pub record_count: usize,
}

impl ReportStatistics {
    pub fn category(&self, category: WasteCategory) -> &CategoryTotal {
        match category {
            WasteCategory::Organic => &self.organic,
            WasteCategory::Recyclable => &self.recyclable,
            WasteCategory::Reject => &self.reject,
        }
    }

    pub(crate) fn category_mut(&mut self, category: WasteCategory) -> &mut CategoryTotal {
        match category {
            WasteCategory::Organic => &mut self.organic,
            WasteCategory::Recyclable => &mut self.recyclable,
            WasteCategory::Reject => &mut self.reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_with_all_fields() {
        let record = WasteRecord::from_document(&json!({
            "clienteId": "hotel-1",
            "timestamp": 1704110400000_i64,
            "peso": 12.5,
            "wasteType": "Orgânico"
        }));

        assert_eq!(record.cliente_id, "hotel-1");
        assert_eq!(record.timestamp, Some(1704110400000));
        assert_eq!(record.peso, 12.5);
        assert_eq!(record.waste_type, "Orgânico");
    }

    #[test]
    fn test_missing_fields_default() {
        let record = WasteRecord::from_document(&json!({}));
        assert_eq!(record.cliente_id, "");
        assert_eq!(record.timestamp, None);
        assert_eq!(record.peso, 0.0);
        assert_eq!(record.waste_type, "");
    }

    #[test]
    fn test_string_weight_with_comma() {
        let record = WasteRecord::from_document(&json!({ "peso": " 7,25 " }));
        assert_eq!(record.peso, 7.25);
    }

    #[test]
    fn test_invalid_weights_become_zero() {
        for peso in [json!("abc"), json!(-3.0), json!(null), json!(true), json!("NaN")] {
            let record = WasteRecord::from_document(&json!({ "peso": peso }));
            assert_eq!(record.peso, 0.0, "peso {:?}", peso);
        }
    }

    #[test]
    fn test_timestamp_object_shapes() {
        let a = WasteRecord::from_document(&json!({
            "timestamp": { "seconds": 1704110400, "nanoseconds": 500000000 }
        }));
        assert_eq!(a.timestamp, Some(1704110400500));

        let b = WasteRecord::from_document(&json!({
            "timestamp": { "_seconds": 1704110400, "_nanoseconds": 0 }
        }));
        assert_eq!(b.timestamp, Some(1704110400000));
    }

    #[test]
    fn test_non_string_waste_type_is_empty() {
        let record = WasteRecord::from_document(&json!({ "wasteType": 42 }));
        assert_eq!(record.waste_type, "");
    }

    #[test]
    fn test_deserialize_from_json_array() {
        let records: Vec<WasteRecord> = serde_json::from_str(
            r#"[{"clienteId":"a","timestamp":"1704110400000","peso":"3"},{"peso":1}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, Some(1704110400000));
        assert_eq!(records[0].peso, 3.0);
        assert_eq!(records[1].cliente_id, "");
    }
}
