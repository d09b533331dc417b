//! Tracing setup for the review pipeline.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Progress and diagnostics via `RUST_LOG`, output
//!   to stderr. Batch progress lines are emitted here at `info`.
//!
//! - **Reports (`core::readable`, CLI output)**: Product artifacts written to
//!   stdout or `reviews_readable/`. Unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,reviewer=info,eval=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `info` for the workspace crates and
/// `warn` for dependencies.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=reviewer=debug cargo run -p eval -- review airline-grok3-0.json
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
