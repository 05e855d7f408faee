use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_DIRECTIVE: &str = "trends_dashboard=info";

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().compact().with_target(false))
        .with(filter)
        .init();
}
