// HTTP snapshot repository - the backend dashboard API client
use crate::application::snapshot_repository::{FetchError, SnapshotRepository};
use crate::domain::filters::FilterState;
use crate::domain::snapshot::{decode_records, DashboardSnapshot, Record};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpSnapshotRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSnapshotRepository {
    /// Build a client with a bounded per-request timeout; expiry is a
    /// transport failure like any other.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn data_url(&self, path: &str, filters: &FilterState) -> String {
        let query = query_string(&filters.query_pairs());
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "backend returned status {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SnapshotRepository for HttpSnapshotRepository {
    async fn fetch_snapshot(
        &self,
        path: &str,
        filters: &FilterState,
    ) -> Result<DashboardSnapshot, FetchError> {
        let url = self.data_url(path, filters);
        tracing::debug!(%url, "fetching dashboard snapshot");
        let value = self.get_json(&url).await?;
        DashboardSnapshot::from_value(value).map_err(FetchError::Decode)
    }

    async fn fetch_auxiliary(&self, path: &str) -> Result<Vec<Record>, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let value = self.get_json(&url).await?;
        match value {
            Value::Array(items) => decode_records(path, items).map_err(FetchError::Decode),
            _ => Err(FetchError::Decode(format!(
                "auxiliary feed {} did not return an array",
                path
            ))),
        }
    }
}

/// Encode query pairs into a query string. Pairs are already filtered
/// down to present fields.
fn query_string(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::DateMode;

    fn repository() -> HttpSnapshotRepository {
        HttpSnapshotRepository::new("http://localhost:5000/", Duration::from_secs(30)).unwrap()
    }

    #[test]
    fn test_data_url_omits_absent_fields() {
        let filters = FilterState {
            start_date: Some("2024-01-01".to_string()),
            search: Some("desk lamp".to_string()),
            ..FilterState::default()
        };
        let url = repository().data_url("/api/dashboard1/data", &filters);
        assert_eq!(
            url,
            "http://localhost:5000/api/dashboard1/data?start_date=2024-01-01&search=desk%20lamp"
        );
    }

    #[test]
    fn test_data_url_without_filters_has_no_query() {
        let url = repository().data_url("/api/dashboard1/data", &FilterState::default());
        assert_eq!(url, "http://localhost:5000/api/dashboard1/data");
    }

    #[test]
    fn test_data_url_with_date_mode() {
        let filters = FilterState {
            date_mode: Some(DateMode::Custom),
            custom_date: Some("2024-03-01".to_string()),
            country: Some("United Kingdom".to_string()),
            ..FilterState::default()
        };
        let url = repository().data_url("/api/dashboard2/data", &filters);
        assert_eq!(
            url,
            "http://localhost:5000/api/dashboard2/data?date_mode=custom&custom_date=2024-03-01&country=United%20Kingdom"
        );
    }

    #[test]
    fn test_query_string_encodes_reserved_characters() {
        let pairs = vec![("search", "a&b=c".to_string())];
        assert_eq!(query_string(&pairs), "search=a%26b%3Dc");
    }
}
