// Dashboard snapshot domain model - one decoded API response
use serde_json::Value;
use std::collections::HashMap;

/// A single flat record within a metric group.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(serde_json::Map<String, Value>);

impl Record {
    pub fn new(fields: serde_json::Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.as_str())
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(|v| v.as_f64())
    }

    /// Numeric field with a zero default for absent or non-numeric values.
    pub fn value(&self, field: &str) -> f64 {
        self.number(field).unwrap_or(0.0)
    }

    /// Categorical field rendered as text. Absent, null, or empty values
    /// display as "Unspecified" rather than a blank cell.
    pub fn label(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => "Unspecified".to_string(),
        }
    }
}

/// One complete, internally consistent set of dashboard metrics returned
/// by a single fetch. Immutable once decoded; the render pass replaces
/// the previous snapshot wholesale.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    groups: HashMap<String, Vec<Record>>,
    current_date: Option<String>,
}

const EMPTY: &[Record] = &[];

impl DashboardSnapshot {
    /// Decode the top-level response object. Array values become record
    /// groups; a bare object counts as a one-record group (the daily
    /// metrics block); `current_date` is captured for the KPI caption;
    /// anything else is ignored.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(map) = value else {
            return Err("expected a JSON object at the top level".to_string());
        };

        let mut snapshot = DashboardSnapshot::default();
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    let records = decode_records(&key, items)?;
                    snapshot.groups.insert(key, records);
                }
                Value::Object(fields) => {
                    snapshot.groups.insert(key, vec![Record::new(fields)]);
                }
                Value::String(s) if key == "current_date" => {
                    snapshot.current_date = Some(s);
                }
                _ => {}
            }
        }
        Ok(snapshot)
    }

    /// Records for a metric group; missing groups read as empty, not as
    /// an error.
    pub fn group(&self, name: &str) -> &[Record] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(EMPTY)
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Attach an auxiliary feed's records under a group name.
    pub fn insert_group(&mut self, name: &str, records: Vec<Record>) {
        self.groups.insert(name.to_string(), records);
    }

    pub fn current_date(&self) -> Option<&str> {
        self.current_date.as_deref()
    }
}

pub fn decode_records(group: &str, items: Vec<Value>) -> Result<Vec<Record>, String> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(Record::new(fields)),
            other => Err(format!(
                "group {} contains a non-object entry: {}",
                group, other
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_groups_and_current_date() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "sales_trend": [{"date": "2024-01-01", "total_sales": 120.5}],
            "daily_metrics": {"order_count": 4, "total_sales": 99.0},
            "current_date": "2024-01-02",
            "extra_scalar": 7
        }))
        .unwrap();

        assert_eq!(snapshot.group("sales_trend").len(), 1);
        assert_eq!(snapshot.group("daily_metrics")[0].value("order_count"), 4.0);
        assert_eq!(snapshot.current_date(), Some("2024-01-02"));
        assert!(!snapshot.has_group("extra_scalar"));
    }

    #[test]
    fn test_missing_group_reads_empty() {
        let snapshot = DashboardSnapshot::from_value(json!({})).unwrap();
        assert!(snapshot.group("top_products").is_empty());
        assert!(!snapshot.has_group("top_products"));
    }

    #[test]
    fn test_non_object_top_level_is_rejected() {
        assert!(DashboardSnapshot::from_value(json!([1, 2, 3])).is_err());
        assert!(DashboardSnapshot::from_value(json!("ok")).is_err());
    }

    #[test]
    fn test_non_object_group_entry_is_rejected() {
        let result = DashboardSnapshot::from_value(json!({"sales_trend": [1]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_record_label_placeholder() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "customer_segments": [
                {"country": "France", "count": 3},
                {"country": null, "count": 2},
                {"count": 1}
            ]
        }))
        .unwrap();
        let rows = snapshot.group("customer_segments");
        assert_eq!(rows[0].label("country"), "France");
        assert_eq!(rows[1].label("country"), "Unspecified");
        assert_eq!(rows[2].label("country"), "Unspecified");
    }
}
