pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::controller::{DashboardController, RefreshPhase, Trigger};
pub use application::snapshot_repository::{FetchError, SnapshotRepository};
pub use presentation::pages::DashboardPage;
