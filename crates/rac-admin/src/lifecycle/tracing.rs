//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//! The level comes from `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Service lifecycle**: startup, shutdown and final store size (`info`)
//! - **Remote calls**: one span per client call with the resource `kind` (`debug`)
//! - **Controllers**: page loads, form transitions, saves (`info`)
//! - **Failures**: rejected writes, failed fetches, degraded fields and discarded stale pages (`warn`/`debug`)
//!
//! ## Example Output
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Resource service started kind="Endpoint"
//! INFO Created kind="Endpoint" id=1 size=1
//! INFO Page loaded kind="Endpoint" generation=1 count=3 total=3
//! INFO Saved kind="Endpoint" id=4 success=Successfully created endpoint.
//! INFO Bulk delete finished kind="Endpoint" succeeded=2 failed=0
//! ```
//!
//! **With `RUST_LOG=debug`** each request also logs its query or payload:
//!
//! ```text
//! DEBUG Fetching page kind="Endpoint" generation=2 page=1 search=rdp
//! DEBUG Discarding stale page kind="Endpoint" generation=1 latest=2
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths add nothing; events carry `kind`
        .compact()
        .init();
}
