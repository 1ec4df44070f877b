//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide `tracing` subscriber used by the binary.
//!
//! Lines are compact and carry no module target; actors identify themselves through the
//! `entity_type` field instead. Levels come from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run                 # lifecycle: Created, Action ok, Shutdown
//! RUST_LOG=debug cargo run                # full payloads (?params, ?action)
//! RUST_LOG=orderline::checkout=debug cargo run
//! ```
//!
//! A card checkout at `info` reads roughly:
//!
//! ```text
//! INFO Created entity_type="Order" id=order_1 size=1
//! INFO Action ok entity_type="Order" id=order_1
//! INFO place_order: Awaiting admin approval order_id=order_1
//! INFO Payment captured order_id=order_1 amount=2049
//! ```
//!
//! Tests should call [`setup_test_tracing`] instead, which writes through the test harness
//! and tolerates being called from many tests.

/// Installs the global subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Subscriber for tests: output is captured per test and repeated calls are ignored.
pub fn setup_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}
