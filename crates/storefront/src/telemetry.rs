//! Tracing setup for embedding applications.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an `EnvFilter` and a plain fmt layer.
///
/// Defaults to info level for this crate if `RUST_LOG` is not set. Call once
/// at application startup; subsequent calls are a silent no-op so tests and
/// embedders cannot trip over an already-installed subscriber.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tienda_storefront=info".into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
