#![allow(
    clippy::module_name_repetitions,
    reason = "Response suffix is intentional for clarity"
)]

use std::str::FromStr as _;

use bon::Builder;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::Timestamp;
use crate::alpha::types::{OrderStatus, OrderType, Side, TimeInForce};
use crate::serde_helpers::StringFromAny;
use crate::types::Decimal;

/// Number of positional fields in a kline row.
const KLINE_FIELDS: usize = 12;

#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, Builder, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[builder(on(String, into))]
pub struct TokenConfig {
    pub network: String,
    pub coin: String,
    pub name: String,
    pub symbol: String,
    pub entity_tag: String,
    pub is_default: bool,
    pub deposit_enable: bool,
    pub withdraw_enable: bool,
    pub deposit_desc: String,
    pub withdraw_desc: String,
    pub special_deposit_tips: String,
    pub special_withdraw_tips: String,
    pub address_regex: String,
    pub address_rule: String,
    pub memo_regex: String,
    pub withdraw_fee: Option<Decimal>,
    pub withdraw_min: Option<Decimal>,
    pub withdraw_max: Option<Decimal>,
    pub deposit_dust: Option<Decimal>,
    pub min_confirm: u32,
    pub un_lock_confirm: u32,
    pub same_address: bool,
    pub estimated_arrival_time: u64,
    pub contract_address_url: String,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExchangeInfoAsset {
    pub asset: String,
}

/// A trading rule of a symbol. Which of the optional fields are set depends on `filter_type`.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SymbolFilter {
    pub filter_type: String,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub tick_size: Option<Decimal>,
    pub step_size: Option<Decimal>,
    pub max_qty: Option<Decimal>,
    pub min_qty: Option<Decimal>,
    pub limit: Option<u32>,
    pub min_notional: Option<Decimal>,
    pub max_notional: Option<Decimal>,
    pub multiplier_down: Option<Decimal>,
    pub multiplier_up: Option<Decimal>,
    pub bid_multiplier_up: Option<Decimal>,
    pub ask_multiplier_up: Option<Decimal>,
    pub bid_multiplier_down: Option<Decimal>,
    pub ask_multiplier_down: Option<Decimal>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfoSymbol {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(default)]
    pub price_precision: u32,
    #[serde(default)]
    pub quantity_precision: u32,
    #[serde(default)]
    pub base_asset_precision: u32,
    #[serde(default)]
    pub quote_precision: u32,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
    #[serde(default)]
    pub order_types: Vec<OrderType>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfoResponse {
    pub timezone: String,
    #[serde(default)]
    pub assets: Vec<ExchangeInfoAsset>,
    #[serde(default)]
    pub symbols: Vec<ExchangeInfoSymbol>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Builder, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommissionFeeResponse {
    pub buyer_commission: Decimal,
    pub seller_commission: Decimal,
}

/// One candlestick.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Builder, PartialEq)]
pub struct Kline {
    pub open_time: Timestamp,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: Timestamp,
    pub quote_asset_volume: Decimal,
    pub number_of_trades: u64,
    pub taker_buy_base_asset_volume: Decimal,
    pub taker_buy_quote_asset_volume: Decimal,
    #[builder(into, default)]
    pub ignore: String,
}

impl Kline {
    /// Reads a positional row. Rows shorter than [`KLINE_FIELDS`] are rejected; a field whose
    /// JSON type does not match stays at its default. Any JSON number is accepted for times and
    /// counts, including float notation.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Times and counts written as floats, e.g. 1.7e12, are whole numbers"
    )]
    fn from_row(row: &[Value]) -> Option<Self> {
        if row.len() < KLINE_FIELDS {
            return None;
        }

        let integer = |i: usize| {
            row[i]
                .as_i64()
                .or_else(|| row[i].as_f64().map(|v| v as i64))
                .unwrap_or_default()
        };
        let decimal = |i: usize| {
            row[i]
                .as_str()
                .and_then(|s| {
                    Decimal::from_str(s)
                        .or_else(|_| Decimal::from_scientific(s))
                        .ok()
                })
                .unwrap_or_default()
        };

        Some(Self {
            open_time: integer(0),
            open: decimal(1),
            high: decimal(2),
            low: decimal(3),
            close: decimal(4),
            volume: decimal(5),
            close_time: integer(6),
            quote_asset_volume: decimal(7),
            number_of_trades: row[8]
                .as_u64()
                .or_else(|| row[8].as_f64().map(|v| v as u64))
                .unwrap_or_default(),
            taker_buy_base_asset_volume: decimal(9),
            taker_buy_quote_asset_volume: decimal(10),
            ignore: row[11].as_str().unwrap_or_default().to_owned(),
        })
    }
}

/// Candlesticks as returned by [`KLINES`](crate::alpha::KLINES): an array of positional rows.
///
/// Decoding is lenient. Rows with fewer than 12 entries are skipped, and an entry of the wrong
/// JSON type (times and counts are numbers, prices are strings) is left at its default instead
/// of failing the whole response.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Klines(pub Vec<Kline>);

impl Klines {
    #[must_use]
    pub fn into_inner(self) -> Vec<Kline> {
        self.0
    }
}

impl std::ops::Deref for Klines {
    type Target = [Kline];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Klines {
    type Item = Kline;
    type IntoIter = std::vec::IntoIter<Kline>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de> Deserialize<'de> for Klines {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<Value>>::deserialize(deserializer)?;

        Ok(Self(
            rows.iter().filter_map(|row| Kline::from_row(row)).collect(),
        ))
    }
}

/// 24 hour rolling window statistics.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Builder, PartialEq)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct TickerResponse {
    pub symbol: String,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub weighted_avg_price: Decimal,
    pub last_price: Decimal,
    pub last_qty: Decimal,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    pub open_time: Timestamp,
    pub close_time: Timestamp,
    pub first_id: i64,
    pub last_id: i64,
    pub count: u64,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Builder, PartialEq)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct TickerPriceResponse {
    pub symbol: String,
    pub price: Decimal,
    #[serde(default)]
    pub time: Option<Timestamp>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Builder, PartialEq)]
pub struct AggTrade {
    #[serde(rename = "a")]
    pub agg_trade_id: i64,
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "q")]
    pub quantity: Decimal,
    #[serde(rename = "f")]
    pub first_trade_id: i64,
    #[serde(rename = "l")]
    pub last_trade_id: i64,
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
    #[serde(rename = "T")]
    pub transaction_time: Timestamp,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Builder, PartialEq)]
#[builder(on(String, into))]
pub struct BookTickerResponse {
    #[serde(rename = "u", default)]
    pub update_id: i64,
    #[serde(rename = "e", default)]
    pub event_type: Option<String>,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "b")]
    pub best_bid_price: Decimal,
    #[serde(rename = "B")]
    pub best_bid_qty: Decimal,
    #[serde(rename = "a")]
    pub best_ask_price: Decimal,
    #[serde(rename = "A")]
    pub best_ask_qty: Decimal,
    #[serde(rename = "T", default)]
    pub transaction_time: Timestamp,
    #[serde(rename = "E", default)]
    pub event_time: Timestamp,
}

/// `[price, quantity]` pair of an order book side.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct PriceLevel(pub Decimal, pub Decimal);

impl PriceLevel {
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.1
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepthResponse {
    pub last_update_id: i64,
    #[serde(default)]
    pub symbol: Option<String>,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    #[serde(rename = "T", alias = "t", default)]
    pub transaction_time: Timestamp,
    #[serde(rename = "E", alias = "e", default)]
    pub event_time: Timestamp,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListenKeyResponse {
    pub listen_key: String,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Builder, PartialEq)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct PlaceOrderResponse {
    #[serde_as(as = "StringFromAny")]
    pub order_id: String,
    /// `P` processing, `S` success, `F` failure
    pub status: String,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderResponse {
    #[serde_as(as = "StringFromAny")]
    pub order_id: String,
    pub order_status: OrderStatus,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CancelAllOrdersResponse {
    pub success: bool,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Builder, PartialEq)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct Order {
    #[serde_as(as = "StringFromAny")]
    pub order_id: String,
    pub symbol: String,
    pub status: OrderStatus,
    #[serde_as(as = "Option<StringFromAny>")]
    pub client_order_id: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    pub orig_qty: Decimal,
    #[serde(default)]
    pub executed_qty: Option<Decimal>,
    #[serde(default)]
    pub cum_quote: Option<Decimal>,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(rename = "type", default)]
    pub order_type: Option<OrderType>,
    pub side: Side,
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub stop_price: String,
    #[serde(default)]
    pub orig_type: Option<OrderType>,
    pub time: Timestamp,
    #[serde(default)]
    pub update_time: Option<Timestamp>,
    #[serde_as(as = "Option<StringFromAny>")]
    pub order_list_id: Option<String>,
    /// Pagination cursor for [`ORDER_HISTORY`](crate::alpha::ORDER_HISTORY)
    #[serde_as(as = "Option<StringFromAny>")]
    pub page_id: Option<String>,
    #[serde(default)]
    pub base_asset: Option<String>,
    #[serde(default)]
    pub quote_asset: Option<String>,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub symbol: String,
    #[serde_as(as = "StringFromAny")]
    pub id: String,
    #[serde_as(as = "StringFromAny")]
    pub order_id: String,
    #[serde_as(as = "Option<StringFromAny>")]
    pub trade_id: Option<String>,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
    pub quote_qty: Decimal,
    pub commission: Decimal,
    pub commission_asset: String,
    pub time: Timestamp,
    #[serde_as(as = "Option<StringFromAny>")]
    pub page_id: Option<String>,
    #[serde(default)]
    pub buyer: bool,
    #[serde(default)]
    pub base_asset: Option<String>,
    #[serde(default)]
    pub quote_asset: Option<String>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub last_trade: bool,
}

/// Balance of one token in the alpha wallet.
#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Builder, PartialEq)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct AlphaAsset {
    #[serde_as(as = "StringFromAny")]
    pub chain_id: String,
    pub contract_address: String,
    pub alpha_id: String,
    #[serde(default)]
    pub cex_asset_code: Option<String>,
    pub free: Decimal,
    pub freeze: Decimal,
    pub locked: Decimal,
    pub withdrawing: Decimal,
    pub amount: Decimal,
    #[serde(default)]
    pub valuation: Option<Decimal>,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenMapping {
    #[serde_as(as = "StringFromAny")]
    pub token_id: String,
    #[serde_as(as = "StringFromAny")]
    pub chain_id: String,
    pub chain_icon_url: String,
    pub chain_name: String,
    pub contract_address: String,
    pub name: String,
    pub symbol: String,
    pub price: Option<Decimal>,
    pub percent_change24h: Option<Decimal>,
    pub volume24h: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub fdv: Option<Decimal>,
    pub liquidity: Option<Decimal>,
    pub total_supply: Option<Decimal>,
    pub circulating_supply: Option<Decimal>,
    #[serde_as(as = "StringFromAny")]
    pub holders: String,
    pub decimals: u32,
    pub listing_cex: bool,
    pub hot_tag: bool,
    pub cex_coin_name: String,
    pub can_transfer: bool,
    pub denomination: u32,
    pub offline: bool,
    pub trade_decimal: u32,
    pub alpha_id: String,
    pub offsell: bool,
    pub price_high24h: Option<Decimal>,
    pub price_low24h: Option<Decimal>,
    pub online_tge: bool,
    pub online_airdrop: bool,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WithdrawResponse {
    #[serde_as(as = "StringFromAny")]
    pub id: String,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRecord {
    #[serde_as(as = "StringFromAny")]
    pub id: String,
    pub network: String,
    pub alpha_id: String,
    pub contract_address: String,
    #[serde(default)]
    pub coin_name: Option<String>,
    pub address: String,
    #[serde(default)]
    pub address_tag: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub tx_id: Option<String>,
    /// `yyyy-MM-dd HH:mm:ss`, as sent by the exchange
    #[serde(default)]
    pub apply_time: Option<String>,
    #[serde(default)]
    pub complete_time: Option<String>,
    #[serde(default)]
    pub confirm_no: u32,
    pub status: i32,
    #[serde(default)]
    pub transaction_fee: Option<Decimal>,
    #[serde(default)]
    pub info: Option<String>,
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    #[serde_as(as = "StringFromAny")]
    pub id: String,
    pub network: String,
    pub alpha_id: String,
    pub contract_address: String,
    #[serde(default)]
    pub coin_name: Option<String>,
    pub address: String,
    #[serde(default)]
    pub address_tag: Option<String>,
    pub amount: Decimal,
    pub tx_id: String,
    #[serde(default)]
    pub complete_time: Option<Timestamp>,
    #[serde(default)]
    pub confirmation_no: u64,
    pub insert_time: Timestamp,
    #[serde(default)]
    pub source_address: Option<String>,
    pub status: i32,
    #[serde(default)]
    pub unlock_confirm: u32,
}

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DepositAddressResponse {
    pub network: String,
    pub address: String,
    #[serde(default)]
    pub tag: String,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn row(open_time: i64) -> Value {
        json!([
            open_time,
            "0.5",
            "0.6",
            "0.4",
            "0.55",
            "1000",
            open_time + 3_599_999,
            "550",
            42,
            "600",
            "330",
            "0"
        ])
    }

    #[test]
    fn klines_should_succeed() -> anyhow::Result<()> {
        let klines: Klines = serde_json::from_value(json!([row(1_700_000_000_000)]))?;

        let expected = Kline::builder()
            .open_time(1_700_000_000_000)
            .open(dec!(0.5))
            .high(dec!(0.6))
            .low(dec!(0.4))
            .close(dec!(0.55))
            .volume(dec!(1000))
            .close_time(1_700_003_599_999)
            .quote_asset_volume(dec!(550))
            .number_of_trades(42)
            .taker_buy_base_asset_volume(dec!(600))
            .taker_buy_quote_asset_volume(dec!(330))
            .ignore("0")
            .build();

        assert_eq!(klines.into_inner(), vec![expected]);

        Ok(())
    }

    #[test]
    fn short_kline_rows_are_skipped() -> anyhow::Result<()> {
        let klines: Klines = serde_json::from_value(json!([
            [1_700_000_000_000_i64, "0.5", "0.6"],
            row(1_700_003_600_000),
            []
        ]))?;

        assert_eq!(klines.len(), 1);
        assert_eq!(klines[0].open_time, 1_700_003_600_000);

        Ok(())
    }

    #[test]
    fn mistyped_kline_fields_default() -> anyhow::Result<()> {
        let mut bad = row(1_700_000_000_000);
        bad[0] = json!("1700000000000");
        bad[1] = json!(0.5);
        bad[8] = json!(null);

        let klines: Klines = serde_json::from_value(json!([bad]))?;

        assert_eq!(klines[0].open_time, 0);
        assert_eq!(klines[0].open, Decimal::ZERO);
        assert_eq!(klines[0].number_of_trades, 0);
        assert_eq!(klines[0].high, dec!(0.6));

        Ok(())
    }

    #[test]
    fn float_notation_kline_numbers_are_read() -> anyhow::Result<()> {
        let mut floats = row(0);
        floats[0] = json!(1.7e12);
        floats[6] = json!(1_700_003_599_999.0);
        floats[8] = json!(42.0);

        let klines: Klines = serde_json::from_value(json!([floats]))?;

        assert_eq!(klines[0].open_time, 1_700_000_000_000);
        assert_eq!(klines[0].close_time, 1_700_003_599_999);
        assert_eq!(klines[0].number_of_trades, 42);

        Ok(())
    }

    #[test]
    fn klines_must_still_be_an_array() {
        let result = serde_json::from_value::<Klines>(json!({"code": 0}));

        assert!(result.is_err(), "an object is not a kline list");
    }

    #[test]
    fn depth_should_succeed() -> anyhow::Result<()> {
        let depth: DepthResponse = serde_json::from_value(json!({
            "lastUpdateId": 1027024,
            "bids": [["4.00000000", "431.00000000"]],
            "asks": [["4.00000200", "12.00000000"]],
            "T": 1_700_000_000_000_i64
        }))?;

        assert_eq!(depth.bids[0].price(), dec!(4.00000000));
        assert_eq!(depth.asks[0].quantity(), dec!(12));
        assert_eq!(depth.transaction_time, 1_700_000_000_000);
        assert_eq!(depth.symbol, None);

        Ok(())
    }

    #[test]
    fn order_should_succeed() -> anyhow::Result<()> {
        let order: Order = serde_json::from_value(json!({
            "orderId": 12345,
            "symbol": "ALPHA_1USDT",
            "status": "PARTIALLY_FILLED",
            "clientOrderId": "my-order",
            "price": "0.5",
            "avgPrice": "0.49",
            "origQty": "10",
            "executedQty": "4",
            "cumQuote": "1.96",
            "timeInForce": "GTC",
            "type": "LIMIT",
            "side": "BUY",
            "stopPrice": null,
            "time": 1_700_000_000_000_i64,
            "updateTime": 1_700_000_001_000_i64,
            "orderListId": -1,
            "baseAsset": "ALPHA_1",
            "quoteAsset": "USDT"
        }))?;

        assert_eq!(order.order_id, "12345");
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.order_type, Some(OrderType::Limit));
        assert_eq!(order.order_list_id.as_deref(), Some("-1"));
        assert_eq!(order.stop_price, "");
        assert_eq!(order.executed_qty, Some(dec!(4)));

        Ok(())
    }

    #[test]
    fn book_ticker_uses_short_names() -> anyhow::Result<()> {
        let ticker: BookTickerResponse = serde_json::from_value(json!({
            "s": "ALPHA_1USDT",
            "b": "0.49",
            "B": "100",
            "a": "0.51",
            "A": "80"
        }))?;

        assert_eq!(ticker.best_bid_price, dec!(0.49));
        assert_eq!(ticker.best_ask_qty, dec!(80));
        assert_eq!(ticker.update_id, 0);

        Ok(())
    }
}
