//! Deterministic, pure logic shared by the review pipeline.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod case_format;
pub mod domain;
pub mod questions;
pub mod readable;
pub mod score;
pub mod stats;
pub mod types;
