//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset: reservation-core crates at
/// `info`, everything else at `warn`.
const DEFAULT_DIRECTIVES: &str = "warn,motoreserve_core=info,motoreserve_catalog=info,\
     motoreserve_stock=info,motoreserve_reservations=info,motoreserve_query=info";

/// Initialize tracing for the process.
///
/// JSON logs, filter driven by `RUST_LOG` with [`DEFAULT_DIRECTIVES`] as the
/// fallback. Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
