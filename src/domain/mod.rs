// Domain layer - Core data models and display rules
pub mod filters;
pub mod snapshot;
pub mod widget;
