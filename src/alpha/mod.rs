//! The exchange's alpha market: market data, trading and the alpha wallet.
//!
//! Every endpoint is described by a static [`Endpoint`](crate::endpoint::Endpoint) in
//! [`endpoints`] and called through [`Client::call`](crate::client::Client::call). Parameters
//! with more than a couple of fields have a typed builder in [`types::request`]; responses
//! decode into the records in [`types::response`].
//!
//! | Endpoint | Response |
//! |---|---|
//! | [`QUOTE_ASSETS`] | `Vec<String>` |
//! | [`TOKEN_INFO`] | `Vec<`[`TokenConfig`](types::response::TokenConfig)`>` |
//! | [`EXCHANGE_INFO`] | [`ExchangeInfoResponse`](types::response::ExchangeInfoResponse) |
//! | [`COMMISSION_FEE`] | [`CommissionFeeResponse`](types::response::CommissionFeeResponse) |
//! | [`KLINES`] | [`Klines`](types::response::Klines) |
//! | [`TICKER`] | [`TickerResponse`](types::response::TickerResponse) |
//! | [`TICKER_PRICE`] | [`TickerPriceResponse`](types::response::TickerPriceResponse) |
//! | [`AGG_TRADES`] | `Vec<`[`AggTrade`](types::response::AggTrade)`>` |
//! | [`BOOK_TICKER`] | [`BookTickerResponse`](types::response::BookTickerResponse) |
//! | [`DEPTH`] | [`DepthResponse`](types::response::DepthResponse) |
//! | [`LISTEN_KEY`] | [`ListenKeyResponse`](types::response::ListenKeyResponse) |
//! | [`PLACE_ORDER`] | [`PlaceOrderResponse`](types::response::PlaceOrderResponse) |
//! | [`CANCEL_ORDER`] | [`CancelOrderResponse`](types::response::CancelOrderResponse) |
//! | [`CANCEL_ALL_ORDERS`] | [`CancelAllOrdersResponse`](types::response::CancelAllOrdersResponse) |
//! | [`OPEN_ORDERS`] | `Vec<`[`Order`](types::response::Order)`>` |
//! | [`ORDER_HISTORY`] | `Vec<`[`Order`](types::response::Order)`>` |
//! | [`ORDER_DETAIL`] | [`Order`](types::response::Order) |
//! | [`USER_TRADES`] | `Vec<`[`Trade`](types::response::Trade)`>` |
//! | [`ALPHA_ASSETS`] | `Vec<`[`AlphaAsset`](types::response::AlphaAsset)`>` |
//! | [`TOKEN_MAPPING`] | `Vec<`[`TokenMapping`](types::response::TokenMapping)`>` |
//! | [`WITHDRAW`] | [`WithdrawResponse`](types::response::WithdrawResponse) |
//! | [`WITHDRAW_HISTORY`] | `Vec<`[`WithdrawRecord`](types::response::WithdrawRecord)`>` |
//! | [`DEPOSIT_HISTORY`] | `Vec<`[`DepositRecord`](types::response::DepositRecord)`>` |
//! | [`DEPOSIT_ADDRESS`] | [`DepositAddressResponse`](types::response::DepositAddressResponse) |
//!
//! ```rust,no_run
//! use binance_alpha_sdk::Result;
//! use binance_alpha_sdk::alpha::KLINES;
//! use binance_alpha_sdk::alpha::types::KlineInterval;
//! use binance_alpha_sdk::alpha::types::request::KlinesRequest;
//! use binance_alpha_sdk::alpha::types::response::Klines;
//! use binance_alpha_sdk::auth::Credentials;
//! use binance_alpha_sdk::client::{Client, Config, MAINNET};
//! use binance_alpha_sdk::types::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::builder().credentials(Credentials::from_env()?).build();
//!     let client = Client::new(MAINNET, config)?;
//!
//!     let request = KlinesRequest::builder()
//!         .symbol("ALPHA_175USDT")
//!         .interval(KlineInterval::OneHour)
//!         .limit(24)
//!         .build();
//!     let klines: Klines = client
//!         .call(&KLINES)
//!         .params(&request)?
//!         .send(&CancellationToken::new())
//!         .await?;
//!
//!     for kline in klines {
//!         println!("{} {}", kline.open_time, kline.close);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod endpoints;
pub mod types;

pub use endpoints::*;
