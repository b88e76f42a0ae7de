use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub backend: BackendSettings,
    pub refresh: RefreshSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_interval_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct PagesConfig {
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageConfig {
    pub id: String,
    pub title: String,
    pub data_path: String,
    /// Whether the page carries a today/custom date mode selector.
    #[serde(default)]
    pub date_mode_selector: bool,
    #[serde(default)]
    pub charts: Vec<ChartBindingConfig>,
    #[serde(default)]
    pub tables: Vec<TableBindingConfig>,
    #[serde(default)]
    pub kpis: Vec<KpiBindingConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartBindingConfig {
    pub id: String,
    pub group: String,
    pub kind: String,
    pub label_field: String,
    pub value_field: String,
    #[serde(default)]
    pub value_format: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableBindingConfig {
    pub id: String,
    pub group: String,
    /// Auxiliary endpoint path to fetch this table from, when its rows
    /// do not come out of the main snapshot.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ColumnConfig {
    pub header: String,
    pub field: String,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KpiBindingConfig {
    pub id: String,
    pub group: String,
    #[serde(default)]
    pub entries: Vec<KpiEntryConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KpiEntryConfig {
    pub id: String,
    pub label: String,
    pub field: String,
    #[serde(default)]
    pub format: Option<String>,
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_pages_config() -> anyhow::Result<PagesConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboards"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_config_defaults() {
        let parsed: PagesConfig = serde_json::from_value(serde_json::json!({
            "pages": [{
                "id": "analytical",
                "title": "Analytical Dashboard",
                "data_path": "/api/dashboard1/data"
            }]
        }))
        .unwrap();

        let page = &parsed.pages[0];
        assert!(!page.date_mode_selector);
        assert!(page.charts.is_empty());
        assert!(page.tables.is_empty());
        assert!(page.kpis.is_empty());
    }
}
