// Presentation layer - Control surfaces and page wiring
pub mod controls;
pub mod pages;
