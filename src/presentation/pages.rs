// Page assembly - wires controls, controller, and triggers for one dashboard
use crate::application::controller::{DashboardController, FilterSource, RefreshPhase, Trigger};
use crate::application::render::RenderDistributor;
use crate::application::snapshot_repository::SnapshotRepository;
use crate::infrastructure::config::PageConfig;
use crate::presentation::controls::ControlPanel;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// A live dashboard page: its control surface, its controller loop, and
/// the trigger channel feeding it.
pub struct DashboardPage {
    id: String,
    title: String,
    controls: Arc<ControlPanel>,
    controller: Arc<DashboardController>,
    triggers: mpsc::Sender<Trigger>,
    worker: JoinHandle<()>,
}

impl DashboardPage {
    pub fn open(
        page: &PageConfig,
        repository: Arc<dyn SnapshotRepository>,
        refresh_every: Duration,
    ) -> Self {
        let controls = Arc::new(ControlPanel::new(page.date_mode_selector));
        let controller = Arc::new(DashboardController::new(
            page,
            repository,
            Arc::clone(&controls) as Arc<dyn FilterSource>,
        ));
        let (triggers, rx) = mpsc::channel(16);
        let worker = tokio::spawn(Arc::clone(&controller).run(rx, refresh_every));

        Self {
            id: page.id.clone(),
            title: page.title.clone(),
            controls,
            controller,
            triggers,
            worker,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn controls(&self) -> &Arc<ControlPanel> {
        &self.controls
    }

    pub fn distributor(&self) -> Arc<Mutex<RenderDistributor>> {
        self.controller.distributor()
    }

    pub async fn phase(&self) -> RefreshPhase {
        self.controller.phase().await
    }

    /// The explicit "apply filters" action.
    pub async fn apply_filters(&self) {
        self.send(Trigger::Apply).await;
    }

    /// Fired after any bound filter control changes value.
    pub async fn control_changed(&self) {
        self.send(Trigger::ControlChange).await;
    }

    /// Enter pressed in the search field.
    pub async fn submit_search(&self) {
        self.send(Trigger::SearchSubmit).await;
    }

    async fn send(&self, trigger: Trigger) {
        if self.triggers.send(trigger).await.is_err() {
            tracing::warn!(page = %self.id, "trigger dropped, page already closed");
        }
    }

    /// Navigation away from the page: stops the timer loop and joins the
    /// worker. In-flight fetches are abandoned; the distributor discards
    /// their late responses.
    pub async fn close(self) {
        let DashboardPage {
            triggers, worker, ..
        } = self;
        drop(triggers);
        let _ = worker.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::snapshot_repository::FetchError;
    use crate::domain::filters::FilterState;
    use crate::domain::snapshot::{DashboardSnapshot, Record};
    use crate::infrastructure::config::ChartBindingConfig;
    use async_trait::async_trait;
    use serde_json::json;

    struct StubRepository;

    #[async_trait]
    impl SnapshotRepository for StubRepository {
        async fn fetch_snapshot(
            &self,
            _path: &str,
            _filters: &FilterState,
        ) -> Result<DashboardSnapshot, FetchError> {
            DashboardSnapshot::from_value(json!({
                "status_distribution": [{"status": "Completed", "count": 2}]
            }))
            .map_err(FetchError::Decode)
        }

        async fn fetch_auxiliary(&self, _path: &str) -> Result<Vec<Record>, FetchError> {
            Ok(Vec::new())
        }
    }

    fn page_config() -> PageConfig {
        PageConfig {
            id: "operational".to_string(),
            title: "Operational Dashboard".to_string(),
            data_path: "/api/dashboard2/data".to_string(),
            date_mode_selector: true,
            charts: vec![ChartBindingConfig {
                id: "order_status".to_string(),
                group: "status_distribution".to_string(),
                kind: "doughnut".to_string(),
                label_field: "status".to_string(),
                value_field: "count".to_string(),
                value_format: None,
            }],
            tables: Vec::new(),
            kpis: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_apply_runs_a_fetch_cycle() {
        let page = DashboardPage::open(
            &page_config(),
            Arc::new(StubRepository),
            Duration::from_secs(300),
        );
        page.apply_filters().await;

        // The cycle runs on spawned tasks; poll briefly for the apply.
        let distributor = page.distributor();
        for _ in 0..50 {
            if distributor.lock().await.applied_seq() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let distributor = distributor.lock().await;
        assert_eq!(distributor.applied_seq(), 1);
        let chart = distributor.chart("order_status").unwrap();
        assert_eq!(chart.labels(), ["Completed"]);
        drop(distributor);

        page.close().await;
    }

    #[tokio::test]
    async fn test_close_discards_further_renders() {
        let page = DashboardPage::open(
            &page_config(),
            Arc::new(StubRepository),
            Duration::from_secs(300),
        );
        let distributor = page.distributor();
        page.close().await;

        let snapshot = DashboardSnapshot::from_value(json!({})).unwrap();
        assert_eq!(
            distributor.lock().await.apply_if_fresh(1, &snapshot),
            crate::application::render::ApplyOutcome::Stale
        );
    }
}
