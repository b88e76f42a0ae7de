// Repository trait for dashboard data access
use crate::domain::filters::FilterState;
use crate::domain::snapshot::{DashboardSnapshot, Record};
use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of a single fetch. Stale responses are not an error;
/// they are discarded by the render distributor's sequence check.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed dashboard response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Fetch one complete dashboard snapshot for the given filters.
    async fn fetch_snapshot(
        &self,
        path: &str,
        filters: &FilterState,
    ) -> Result<DashboardSnapshot, FetchError>;

    /// Fetch an auxiliary feed (stock alerts, repeat customers). These
    /// are independent of the filter set.
    async fn fetch_auxiliary(&self, path: &str) -> Result<Vec<Record>, FetchError>;
}
