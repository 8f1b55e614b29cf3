//! Logging - tracing subscriber for hosts embedding the wallet
//!
//! `RUST_LOG` overrides the filter. Set `AVAHD_LOG_JSON=1` for one JSON
//! object per event. Secret material is never a logged field.

use tracing_subscriber::{fmt, EnvFilter};

/// Wallet events at info, everything else at warn.
pub const DEFAULT_FILTER: &str = "warn,avahd=info";

pub const LOG_JSON_ENV: &str = "AVAHD_LOG_JSON";

fn wallet_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn json_requested() -> bool {
    matches!(std::env::var(LOG_JSON_ENV).as_deref(), Ok("1") | Ok("true"))
}

/// Install the process-wide subscriber on stderr. A host that already
/// installed one keeps it; later calls are no-ops.
pub fn init_logging() {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(wallet_filter())
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = if json_requested() {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
