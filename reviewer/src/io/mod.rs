//! I/O helpers for the review pipeline.

pub mod batch;
pub mod client;
pub mod config;
pub mod prompt;
pub mod store;
