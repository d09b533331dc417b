//! Review pipeline for simulated customer-service conversations.
//!
//! Failed benchmark simulations are rendered into readable cases, reviewed by
//! a language model against a fixed questionnaire, and scored with a
//! weighted-responsibility scheme. The crate keeps the usual split:
//!
//! - **[`core`]**: Pure, deterministic logic (data model, case rendering,
//!   scoring, statistics, report text). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (files, HTTP, the concurrent batch).
//!   Behind traits where tests need to substitute them.

pub mod core;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
