//! Pulls market data for one alpha pair: candles, depth and the latest price.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example klines --features tracing
//! ```
//!
//! Requires `BINANCE_API_KEY` and `BINANCE_SECRET_KEY`. The pair defaults to `ALPHA_175USDT` and
//! can be overridden with `ALPHA_SYMBOL`.

use binance_alpha_sdk::MAINNET;
use binance_alpha_sdk::alpha::types::KlineInterval;
use binance_alpha_sdk::alpha::types::request::KlinesRequest;
use binance_alpha_sdk::alpha::types::response::{DepthResponse, Klines, TickerPriceResponse};
use binance_alpha_sdk::alpha::{DEPTH, KLINES, QUOTE_ASSETS, TICKER_PRICE};
use binance_alpha_sdk::auth::Credentials;
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

    let symbol = std::env::var("ALPHA_SYMBOL").unwrap_or_else(|_| "ALPHA_175USDT".to_owned());

    let config = Config::builder()
        .credentials(Credentials::from_env()?)
        .recv_window(5_000)
        .build();
    let mut client = Client::new(MAINNET, config)?;
    let cancel = CancellationToken::new();

    if let Err(e) = client.sync_time_offset(&cancel).await {
        error!(endpoint = "sync_time_offset", error = %e);
    }

    match client.call(&QUOTE_ASSETS).send::<Vec<String>>(&cancel).await {
        Ok(assets) => info!(endpoint = %QUOTE_ASSETS, count = assets.len(), ?assets),
        Err(e) => error!(endpoint = %QUOTE_ASSETS, error = %e),
    }

    let request = KlinesRequest::builder()
        .symbol(&symbol)
        .interval(KlineInterval::OneHour)
        .limit(24)
        .build();
    match client
        .call(&KLINES)
        .params(&request)?
        .send::<Klines>(&cancel)
        .await
    {
        Ok(klines) => {
            info!(endpoint = %KLINES, symbol = %symbol, count = klines.len());
            for kline in klines {
                info!(
                    open_time = kline.open_time,
                    open = %kline.open,
                    high = %kline.high,
                    low = %kline.low,
                    close = %kline.close,
                    volume = %kline.volume,
                    trades = kline.number_of_trades
                );
            }
        }
        Err(e) => error!(endpoint = %KLINES, symbol = %symbol, error = %e),
    }

    match client
        .call(&DEPTH)
        .param("symbol", &symbol)
        .param("limit", 5)
        .send::<DepthResponse>(&cancel)
        .await
    {
        Ok(depth) => {
            let best_bid = depth.bids.first().map(|level| level.price());
            let best_ask = depth.asks.first().map(|level| level.price());
            info!(endpoint = %DEPTH, symbol = %symbol, ?best_bid, ?best_ask);
        }
        Err(e) => error!(endpoint = %DEPTH, symbol = %symbol, error = %e),
    }

    match client
        .call(&TICKER_PRICE)
        .param("symbol", &symbol)
        .send::<TickerPriceResponse>(&cancel)
        .await
    {
        Ok(ticker) => info!(endpoint = %TICKER_PRICE, symbol = %ticker.symbol, price = %ticker.price),
        Err(e) => error!(endpoint = %TICKER_PRICE, symbol = %symbol, error = %e),
    }

    Ok(())
}
