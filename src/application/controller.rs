// Dashboard controller - one per page, owns the fetch/render cycle
use crate::application::render::{ApplyOutcome, RenderDistributor};
use crate::application::snapshot_repository::SnapshotRepository;
use crate::domain::filters::FilterState;
use crate::infrastructure::config::PageConfig;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Source of the current filter values. Read fresh at every trigger
/// fire, including timer ticks.
#[async_trait]
pub trait FilterSource: Send + Sync {
    async fn read_filters(&self) -> FilterState;
}

/// Any event that initiates a new fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit "apply filters" action.
    Apply,
    /// A bound filter control changed.
    ControlChange,
    /// Enter pressed in the search field.
    SearchSubmit,
    /// Periodic auto-refresh tick.
    TimerTick,
}

impl Trigger {
    fn as_str(&self) -> &'static str {
        match self {
            Trigger::Apply => "apply",
            Trigger::ControlChange => "control_change",
            Trigger::SearchSubmit => "search_submit",
            Trigger::TimerTick => "timer_tick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Fetching,
    Applying,
}

/// Coordinates one page's triggers, fetches, and renders. Triggers never
/// block each other; overlapping fetches are resolved by the sequence
/// number assigned at initiation, with the distributor discarding
/// anything older than what it last applied.
pub struct DashboardController {
    page_id: String,
    data_path: String,
    auxiliary: Vec<(String, String)>,
    repository: Arc<dyn SnapshotRepository>,
    filters: Arc<dyn FilterSource>,
    distributor: Arc<Mutex<RenderDistributor>>,
    seq: AtomicU64,
    phase: Mutex<RefreshPhase>,
}

impl DashboardController {
    pub fn new(
        page: &PageConfig,
        repository: Arc<dyn SnapshotRepository>,
        filters: Arc<dyn FilterSource>,
    ) -> Self {
        let distributor = RenderDistributor::build(page);
        let auxiliary = distributor.auxiliary_feeds();
        Self {
            page_id: page.id.clone(),
            data_path: page.data_path.clone(),
            auxiliary,
            repository,
            filters,
            distributor: Arc::new(Mutex::new(distributor)),
            seq: AtomicU64::new(0),
            phase: Mutex::new(RefreshPhase::Idle),
        }
    }

    pub fn distributor(&self) -> Arc<Mutex<RenderDistributor>> {
        Arc::clone(&self.distributor)
    }

    pub async fn phase(&self) -> RefreshPhase {
        *self.phase.lock().await
    }

    /// Start one fetch cycle. Filters are re-read from the controls and
    /// the sequence number is taken here, at initiation time; the rest
    /// of the cycle runs on a spawned task so the caller is never
    /// blocked by network latency.
    pub async fn refresh(self: Arc<Self>, trigger: Trigger) -> JoinHandle<()> {
        let filters = self.filters.read_filters().await;
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_phase(RefreshPhase::Fetching).await;
        tracing::debug!(
            page = %self.page_id,
            seq,
            trigger = trigger.as_str(),
            "starting fetch cycle"
        );

        tokio::spawn(async move { self.run_cycle(seq, filters).await })
    }

    async fn run_cycle(&self, seq: u64, filters: FilterState) {
        match self.repository.fetch_snapshot(&self.data_path, &filters).await {
            Ok(mut snapshot) => {
                // Auxiliary feeds refresh alongside the main snapshot; a
                // failed feed is logged and its table skipped this cycle.
                for (path, group) in &self.auxiliary {
                    match self.repository.fetch_auxiliary(path).await {
                        Ok(records) => snapshot.insert_group(group, records),
                        Err(e) => {
                            tracing::warn!(
                                page = %self.page_id,
                                feed = %path,
                                error = %e,
                                "auxiliary feed fetch failed"
                            );
                        }
                    }
                }

                self.set_phase(RefreshPhase::Applying).await;
                let outcome = self.distributor.lock().await.apply_if_fresh(seq, &snapshot);
                if outcome == ApplyOutcome::Applied {
                    tracing::debug!(page = %self.page_id, seq, "snapshot applied");
                }
                self.set_phase(RefreshPhase::Idle).await;
            }
            Err(e) => {
                tracing::warn!(page = %self.page_id, seq, error = %e, "fetch cycle failed");
                self.distributor.lock().await.report_error(e.to_string());
                self.set_phase(RefreshPhase::Idle).await;
            }
        }
    }

    /// Event loop: external triggers plus the periodic timer, all feeding
    /// the same fetch cycle. Returns when the trigger channel closes;
    /// that tears the page down, cancelling the timer and marking the
    /// distributor so late responses are discarded.
    pub async fn run(self: Arc<Self>, mut triggers: mpsc::Receiver<Trigger>, refresh_every: Duration) {
        let mut ticker = time::interval_at(Instant::now() + refresh_every, refresh_every);
        loop {
            tokio::select! {
                maybe = triggers.recv() => match maybe {
                    Some(trigger) => {
                        Arc::clone(&self).refresh(trigger).await;
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    Arc::clone(&self).refresh(Trigger::TimerTick).await;
                }
            }
        }
        tracing::debug!(page = %self.page_id, "page torn down");
        self.distributor.lock().await.close();
    }

    async fn set_phase(&self, next: RefreshPhase) {
        let mut phase = self.phase.lock().await;
        if *phase != next {
            tracing::debug!(page = %self.page_id, ?next, "refresh phase change");
            *phase = next;
        }
    }
}
