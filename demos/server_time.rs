//! Checks connectivity and measures the local clock's drift against the exchange.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example server_time --features tracing
//! ```
//!
//! Set `BINANCE_HOST` to target another deployment, e.g. the testnet.

use binance_alpha_sdk::MAINNET;
use binance_alpha_sdk::client::{Client, Config};
use binance_alpha_sdk::types::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = std::env::var("BINANCE_HOST").unwrap_or_else(|_| MAINNET.to_owned());
    let mut client = Client::new(&host, Config::default())?;
    let cancel = CancellationToken::new();

    match client.ping(&cancel).await {
        Ok(()) => info!(endpoint = "ping", host = %host, "reachable"),
        Err(e) => {
            error!(endpoint = "ping", error = %e);
            return Err(e.into());
        }
    }

    match client.server_time(&cancel).await {
        Ok(server_time) => info!(endpoint = "server_time", server_time),
        Err(e) => error!(endpoint = "server_time", error = %e),
    }

    match client.sync_time_offset(&cancel).await {
        Ok(offset) => info!(
            endpoint = "sync_time_offset",
            offset_ms = offset,
            "signed requests will be stamped with the adjusted clock"
        ),
        Err(e) => error!(endpoint = "sync_time_offset", error = %e),
    }

    Ok(())
}
