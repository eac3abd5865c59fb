//! Places a small limit order on an alpha pair and cancels it again.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example place_order --features tracing
//! ```
//!
//! Requires `BINANCE_API_KEY` and `BINANCE_SECRET_KEY`. The order is priced far below the
//! market so that it rests on the book until the cancel arrives; pressing Ctrl-C aborts any
//! request that is still in flight.

use std::time::Duration;

use binance_alpha_sdk::MAINNET;
use binance_alpha_sdk::alpha::types::Side;
use binance_alpha_sdk::alpha::types::request::PlaceOrderRequest;
use binance_alpha_sdk::alpha::types::response::{CancelOrderResponse, Order, PlaceOrderResponse};
use binance_alpha_sdk::alpha::{CANCEL_ORDER, OPEN_ORDERS, PLACE_ORDER};
use binance_alpha_sdk::auth::Credentials;
use binance_alpha_sdk::client::{Client, Config};
use binance_alpha_sdk::types::{CancellationToken, dec};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

const BASE_ASSET: &str = "ALPHA_175";
const QUOTE_ASSET: &str = "USDT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::builder()
        .credentials(Credentials::from_env()?)
        .timeout(Duration::from_secs(10))
        .build();
    let mut client = Client::new(MAINNET, config)?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling in-flight requests");
            on_ctrl_c.cancel();
        }
    });

    client.sync_time_offset(&cancel).await?;

    let request = PlaceOrderRequest::builder()
        .base_asset(BASE_ASSET)
        .quote_asset(QUOTE_ASSET)
        .side(Side::Buy)
        .quantity(dec!(10))
        .price(dec!(0.0001))
        .build();
    let placed: PlaceOrderResponse = match client
        .call(&PLACE_ORDER)
        .params(&request)?
        .send(&cancel)
        .await
    {
        Ok(placed) => {
            info!(endpoint = %PLACE_ORDER, order_id = %placed.order_id, status = %placed.status);
            placed
        }
        Err(e) => {
            if e.is_cancelled() {
                warn!(endpoint = %PLACE_ORDER, "cancelled before the exchange answered");
            } else if let Some(api) = e.api() {
                error!(endpoint = %PLACE_ORDER, code = api.code, msg = %api.message);
            } else {
                error!(endpoint = %PLACE_ORDER, error = %e);
            }
            return Err(e.into());
        }
    };

    let symbol = format!("{BASE_ASSET}{QUOTE_ASSET}");
    match client
        .call(&OPEN_ORDERS)
        .param("symbol", &symbol)
        .send::<Vec<Order>>(&cancel)
        .await
    {
        Ok(orders) => {
            for order in orders {
                info!(
                    endpoint = %OPEN_ORDERS,
                    order_id = %order.order_id,
                    side = %order.side,
                    price = %order.price,
                    quantity = %order.orig_qty,
                    status = %order.status
                );
            }
        }
        Err(e) => error!(endpoint = %OPEN_ORDERS, error = %e),
    }

    match client
        .call(&CANCEL_ORDER)
        .param("symbol", &symbol)
        .param("orderId", &placed.order_id)
        .send::<CancelOrderResponse>(&cancel)
        .await
    {
        Ok(cancelled) => info!(
            endpoint = %CANCEL_ORDER,
            order_id = %cancelled.order_id,
            status = %cancelled.order_status
        ),
        Err(e) => error!(endpoint = %CANCEL_ORDER, error = %e),
    }

    Ok(())
}
