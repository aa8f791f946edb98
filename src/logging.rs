//! Tracing subscriber setup for the server binary.

use crate::config::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.  `RUST_LOG` overrides the default
/// `savings_engine=info` filter.
pub fn init_logger(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("savings_engine=info"));

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt.json())
            .init(),
    }
}
