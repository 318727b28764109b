//! Run with
//!
//! ```not_rust
//! JWT_SECRET=change-me cargo run -p jwtseal-server -- --port 3000
//! ```

use clap::Parser;
use jwtseal_server::{start_server, AppState, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    let state = AppState::from_config(&config);
    info!(
        algorithm = %state.algorithm(),
        token_ttl = state.token_ttl,
        issuing = state.api_key.is_some(),
        "Loaded configuration"
    );

    start_server(config.socket_addr(), state).await
}
