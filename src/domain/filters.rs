// Filter domain model - values read from the page controls
use chrono::NaiveDate;

/// Date selection mode on the operational page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    Today,
    Custom,
}

impl DateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateMode::Today => "today",
            DateMode::Custom => "custom",
        }
    }
}

/// One complete read of the filter controls. Built fresh for every
/// trigger and discarded after the fetch cycle; never cached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    /// Absent when the page has no today/custom selector.
    pub date_mode: Option<DateMode>,
    pub custom_date: Option<String>,
    pub country: Option<String>,
}

impl FilterState {
    /// Serialize to query pairs. Absent fields are omitted entirely so
    /// the backend sees no empty-string parameters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.start_date {
            pairs.push(("start_date", v.clone()));
        }
        if let Some(v) = &self.end_date {
            pairs.push(("end_date", v.clone()));
        }
        if let Some(v) = &self.category {
            pairs.push(("category", v.clone()));
        }
        if let Some(v) = &self.search {
            pairs.push(("search", v.clone()));
        }
        if let Some(mode) = &self.date_mode {
            pairs.push(("date_mode", mode.as_str().to_string()));
        }
        if let Some(v) = &self.custom_date {
            pairs.push(("custom_date", v.clone()));
        }
        if let Some(v) = &self.country {
            pairs.push(("country", v.clone()));
        }
        pairs
    }
}

/// Normalize a date control value to `YYYY-MM-DD`.
///
/// The date picker emits `DD.MM.YYYY` in locale mode and `YYYY-MM-DD`
/// once canonical; the presence of `-` distinguishes the two. Values
/// chrono cannot parse pass through unchanged for the backend to reject.
/// Empty input maps to `None` so the parameter is omitted.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.contains('-') {
        return Some(raw.to_string());
    }
    match NaiveDate::parse_from_str(raw, "%d.%m.%Y") {
        Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale_date() {
        assert_eq!(normalize_date("25.12.2023"), Some("2023-12-25".to_string()));
        assert_eq!(normalize_date("1.2.2024"), Some("2024-02-01".to_string()));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_date("25.12.2023").unwrap();
        let twice = normalize_date(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(normalize_date("2023-12-25"), Some("2023-12-25".to_string()));
    }

    #[test]
    fn test_normalize_empty_is_absent() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("   "), None);
    }

    #[test]
    fn test_normalize_unparseable_passes_through() {
        assert_eq!(normalize_date("yesterday"), Some("yesterday".to_string()));
    }

    #[test]
    fn test_query_pairs_omit_absent_fields() {
        let filters = FilterState {
            category: Some("Electronics".to_string()),
            search: Some("lamp".to_string()),
            ..FilterState::default()
        };
        let pairs = filters.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("category", "Electronics".to_string()),
                ("search", "lamp".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_empty_filters() {
        assert!(FilterState::default().query_pairs().is_empty());
    }

    #[test]
    fn test_query_pairs_date_mode() {
        let filters = FilterState {
            date_mode: Some(DateMode::Custom),
            custom_date: Some("2024-03-01".to_string()),
            country: Some("Germany".to_string()),
            ..FilterState::default()
        };
        let pairs = filters.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("date_mode", "custom".to_string()),
                ("custom_date", "2024-03-01".to_string()),
                ("country", "Germany".to_string()),
            ]
        );
    }
}
