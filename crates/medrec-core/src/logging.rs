//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "MEDREC_LOG";

const DEFAULT_FILTER: &str = "medrec=info";

static INIT: Once = Once::new();

/// Initialize logging.
///
/// Reads `MEDREC_LOG` for per-module levels, e.g.
/// `MEDREC_LOG=medrec_core::ranking=debug,medrec_llm=warn`. Falls back to
/// `medrec=info` when unset or invalid. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber installed elsewhere (e.g. by a host binary) wins
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("logging initialized twice");
    }
}
