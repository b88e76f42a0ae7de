// Main entry point - Dependency injection and page setup
use std::{sync::Arc, time::Duration};

use retail_dashboard::infrastructure::config::{load_pages_config, load_server_config};
use retail_dashboard::infrastructure::http_repository::HttpSnapshotRepository;
use retail_dashboard::{DashboardPage, SnapshotRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let server_config = load_server_config()?;
    let pages_config = load_pages_config()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn SnapshotRepository> = Arc::new(HttpSnapshotRepository::new(
        &server_config.backend.base_url,
        Duration::from_secs(server_config.backend.timeout_secs),
    )?);

    // Open pages (presentation layer); each runs its own trigger loop
    let refresh_every = Duration::from_secs(server_config.refresh.interval_secs);
    let mut pages = Vec::new();
    for page_config in &pages_config.pages {
        let page = DashboardPage::open(page_config, Arc::clone(&repository), refresh_every);
        tracing::info!(page = page.id(), title = page.title(), "page opened");
        // First paint: fetch with the default (empty) filter set
        page.apply_filters().await;
        pages.push(page);
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    for page in pages {
        page.close().await;
    }

    Ok(())
}
