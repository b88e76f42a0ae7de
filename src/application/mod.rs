// Application layer - Use cases and coordination
pub mod controller;
pub mod render;
pub mod snapshot_repository;
