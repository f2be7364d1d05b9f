//! # Observability & Tracing
//!
//! The console logs through the `tracing` crate with structured fields. The events worth
//! knowing about:
//!
//! - **Requests**: `Sending request method=GET path=/users?page=1&limit=10` (debug)
//! - **Session**: `Session expired, redirecting to login` (info), `Logged in` (info)
//! - **Screens**: `Discarding stale page` (debug), `Saved`/`Rejected` (info/warn)
//! - **Selectors**: `Failed to load candidates` (warn)
//!
//! ```bash
//! RUST_LOG=info cargo run -p game-console
//! RUST_LOG=console_framework=debug cargo run -p game-console
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
