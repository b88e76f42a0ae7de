// Filter control surface - the page's input controls as the controller sees them
use crate::application::controller::FilterSource;
use crate::domain::filters::{normalize_date, DateMode, FilterState};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
struct ControlValues {
    start_date: String,
    end_date: String,
    category: String,
    country: String,
    search: String,
    date_mode: Option<DateMode>,
    custom_date: String,
}

/// Current values of one page's filter controls. The page surface writes
/// them; the controller re-reads them at every trigger fire. Reading has
/// no side effects and nothing here outlives a single fetch cycle.
#[derive(Debug)]
pub struct ControlPanel {
    values: RwLock<ControlValues>,
}

impl ControlPanel {
    pub fn new(date_mode_selector: bool) -> Self {
        let values = ControlValues {
            date_mode: date_mode_selector.then_some(DateMode::Today),
            ..ControlValues::default()
        };
        Self {
            values: RwLock::new(values),
        }
    }

    pub async fn set_start_date(&self, raw: &str) {
        self.values.write().await.start_date = raw.to_string();
    }

    pub async fn set_end_date(&self, raw: &str) {
        self.values.write().await.end_date = raw.to_string();
    }

    pub async fn set_category(&self, raw: &str) {
        self.values.write().await.category = raw.to_string();
    }

    pub async fn set_country(&self, raw: &str) {
        self.values.write().await.country = raw.to_string();
    }

    pub async fn set_search(&self, raw: &str) {
        self.values.write().await.search = raw.to_string();
    }

    /// Picking a date in the custom-date control also selects custom
    /// mode, as the original control wiring did.
    pub async fn select_custom_date(&self, raw: &str) {
        let mut values = self.values.write().await;
        values.custom_date = raw.to_string();
        if values.date_mode.is_some() {
            values.date_mode = Some(DateMode::Custom);
        }
    }

    /// No-op on pages without a mode selector.
    pub async fn select_date_mode(&self, mode: DateMode) {
        let mut values = self.values.write().await;
        if values.date_mode.is_some() {
            values.date_mode = Some(mode);
        }
    }
}

#[async_trait]
impl FilterSource for ControlPanel {
    async fn read_filters(&self) -> FilterState {
        let values = self.values.read().await.clone();
        FilterState {
            start_date: normalize_date(&values.start_date),
            end_date: normalize_date(&values.end_date),
            category: present(&values.category),
            search: present(&values.search),
            date_mode: values.date_mode,
            custom_date: normalize_date(&values.custom_date),
            country: present(&values.country),
        }
    }
}

fn present(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
