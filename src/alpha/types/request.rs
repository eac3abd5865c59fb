#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

//! Typed parameter sets for the alpha endpoints with more than a couple of parameters. Pass them
//! to [`EndpointCall::params`](crate::endpoint::EndpointCall::params); field names serialize to
//! the exchange's camelCase parameter names and `None` fields are left out.

use bon::Builder;
use serde::Serialize;
use serde_with::{StringWithSeparator, formats::CommaSeparator, serde_as, skip_serializing_none};

use crate::Timestamp;
use crate::alpha::types::{KlineInterval, OrderStatus, Side, WalletType};
use crate::types::Decimal;

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct KlinesRequest {
    /// Alpha trading pair, e.g. `ALPHA_175USDT`
    pub symbol: String,
    pub interval: KlineInterval,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    /// Default 500, max 1000
    pub limit: Option<u32>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct AggTradesRequest {
    pub symbol: String,
    pub from_id: Option<i64>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub limit: Option<u32>,
}

/// A limit order. `quantity` and `price` are sent exactly as the [`Decimal`]s are written.
#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct PlaceOrderRequest {
    /// Alpha token id, e.g. `ALPHA_175`
    pub base_asset: String,
    pub quote_asset: String,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
    pub client_order_id: Option<String>,
    pub wallet_type: Option<WalletType>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct OrderHistoryRequest {
    pub base_asset: Option<String>,
    pub side: Option<Side>,
    pub order_status: Option<OrderStatus>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub limit: Option<u32>,
    /// Cursor returned as `pageId` by the previous page
    pub page_id: Option<String>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct UserTradesRequest {
    pub base_asset: Option<String>,
    pub side: Option<Side>,
    pub order_id: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub limit: Option<u32>,
    pub page_id: Option<String>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct WithdrawRequest {
    pub network: String,
    pub alpha_id: String,
    pub contract_address: String,
    pub address: String,
    /// Memo for networks that need one
    pub address_tag: Option<String>,
    pub amount: Decimal,
    pub client_order_id: Option<String>,
}

#[non_exhaustive]
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct WithdrawHistoryRequest {
    pub alpha_id: Option<String>,
    pub client_order_id: Option<String>,
    pub status: Option<i32>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    /// Withdrawal ids, sent comma separated
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[builder(default)]
    pub id_list: Vec<String>,
}

#[non_exhaustive]
#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct DepositHistoryRequest {
    pub alpha_id: Option<String>,
    pub tx_id: Option<String>,
    pub status: Option<i32>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub include_source: Option<bool>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn place_order_serializes_to_exchange_names() -> anyhow::Result<()> {
        let request = PlaceOrderRequest::builder()
            .base_asset("ALPHA_1")
            .quote_asset("USDT")
            .side(Side::Buy)
            .quantity(dec!(10))
            .price(dec!(0.5))
            .build();

        assert_eq!(
            serde_html_form::to_string(&request)?,
            "baseAsset=ALPHA_1&quoteAsset=USDT&side=BUY&quantity=10&price=0.5"
        );

        Ok(())
    }

    #[test]
    fn id_list_is_comma_separated() -> anyhow::Result<()> {
        let request = WithdrawHistoryRequest::builder()
            .id_list(vec!["1".to_owned(), "2".to_owned()])
            .limit(10)
            .build();

        assert_eq!(serde_html_form::to_string(&request)?, "limit=10&idList=1%2C2");
        assert_eq!(
            serde_html_form::to_string(&WithdrawHistoryRequest::default())?,
            ""
        );

        Ok(())
    }

    #[test]
    fn klines_interval_uses_wire_value() -> anyhow::Result<()> {
        let request = KlinesRequest::builder()
            .symbol("ALPHA_1USDT")
            .interval(KlineInterval::OneHour)
            .limit(2)
            .build();

        assert_eq!(
            serde_html_form::to_string(&request)?,
            "symbol=ALPHA_1USDT&interval=1h&limit=2"
        );

        Ok(())
    }
}
