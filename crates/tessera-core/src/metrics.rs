//! Prometheus metrics helpers for Tessera.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tessera_core::metrics::{increment, try_init_metrics, TILE_SAVES_TOTAL};
//!
//! let handle = try_init_metrics();
//! increment(TILE_SAVES_TOTAL, 1);
//! let body = handle.map(|h| h.render());
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: `tessera_`
//! - Suffix: unit or type (`_total`, `_bytes`)
//! - Labels: only low-cardinality values such as a skip reason

use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Successful publish runs.
pub const PUBLISH_TOTAL: &str = "tessera_publish_total";
/// Publish runs that failed to persist the document.
pub const PUBLISH_FAILURES_TOTAL: &str = "tessera_publish_failures_total";
/// Size of the last published document.
pub const PUBLISH_BYTES: &str = "tessera_publish_bytes";
/// Tiles rendered into a document (publish or preview).
pub const TILES_RENDERED_TOTAL: &str = "tessera_tiles_rendered_total";
/// Tiles skipped during composition (label `reason`).
pub const TILES_SKIPPED_TOTAL: &str = "tessera_tiles_skipped_total";
/// Tiles saved through the store.
pub const TILE_SAVES_TOTAL: &str = "tessera_tile_saves_total";
/// Saves rejected by validation.
pub const TILE_VALIDATION_FAILURES_TOTAL: &str = "tessera_tile_validation_failures_total";
/// Tiles currently stored.
pub const TILES_STORED: &str = "tessera_tiles_stored";

/// Install the Prometheus recorder and describe every metric.
///
/// Returns `None` if a recorder is already installed; the helpers below
/// still work and record into whichever recorder is active.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().ok()?;
    register_descriptions();
    Some(handle)
}

fn register_descriptions() {
    describe_counter!(PUBLISH_TOTAL, "Successful publish runs");
    describe_counter!(
        PUBLISH_FAILURES_TOTAL,
        "Publish runs that failed to back up or write the document"
    );
    describe_gauge!(PUBLISH_BYTES, "Size in bytes of the last published document");
    describe_counter!(
        TILES_RENDERED_TOTAL,
        "Tiles rendered into a generated document"
    );
    describe_counter!(
        TILES_SKIPPED_TOTAL,
        "Tiles skipped during generation (label: reason)"
    );
    describe_counter!(TILE_SAVES_TOTAL, "Tiles saved through the editor");
    describe_counter!(
        TILE_VALIDATION_FAILURES_TOTAL,
        "Tile saves rejected by validation"
    );
    describe_gauge!(TILES_STORED, "Number of tiles currently stored");
}

/// Increment a counter.
#[inline]
pub fn increment(name: &'static str, count: u64) {
    metrics::counter!(name).increment(count);
}

/// Increment a counter carrying a `reason` label.
#[inline]
pub fn increment_with_reason(name: &'static str, reason: &'static str) {
    metrics::counter!(name, "reason" => reason).increment(1);
}

/// Set a gauge value.
#[inline]
pub fn set_gauge(name: &'static str, value: f64) {
    metrics::gauge!(name).set(value);
}
