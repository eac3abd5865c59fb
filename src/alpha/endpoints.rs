//! Descriptors for every alpha endpoint. All of them are [`SecurityLevel::Signed`].

use phf::phf_map;

use crate::auth::SecurityLevel;
use crate::endpoint::{Endpoint, Param};
use crate::request::Method;

const fn signed(
    name: &'static str,
    method: Method,
    path: &'static str,
    params: &'static [Param],
) -> Endpoint {
    Endpoint::new(name, method, path, SecurityLevel::Signed, params)
}

// Market data

/// Quote assets available for alpha trading. Returns a list of asset names.
pub static QUOTE_ASSETS: Endpoint = signed(
    "quote-assets",
    Method::Get,
    "/sapi/v1/alpha-trade/get-from-asset",
    &[],
);

/// Network and deposit/withdraw configuration of every alpha token.
pub static TOKEN_INFO: Endpoint = signed(
    "token-info",
    Method::Get,
    "/sapi/v1/capital/alpha/config/getall",
    &[],
);

pub static EXCHANGE_INFO: Endpoint = signed(
    "exchange-info",
    Method::Get,
    "/sapi/v1/alpha-trade/get-exchange-info",
    &[],
);

pub static COMMISSION_FEE: Endpoint = signed(
    "commission-fee",
    Method::Get,
    "/sapi/v1/alpha-trade/get-fee-rate",
    &[Param::query("symbol").required()],
);

/// Candlesticks. The response is decoded with [`Klines`](super::types::response::Klines).
pub static KLINES: Endpoint = signed(
    "klines",
    Method::Get,
    "/sapi/v1/alpha-trade/market/klines",
    &[
        Param::query("symbol").required(),
        Param::query("interval").required(),
        Param::query("startTime"),
        Param::query("endTime"),
        Param::query("limit"),
    ],
);

/// 24 hour rolling window statistics.
pub static TICKER: Endpoint = signed(
    "ticker",
    Method::Get,
    "/sapi/v1/alpha-trade/market/ticker",
    &[Param::query("symbol").required()],
);

pub static TICKER_PRICE: Endpoint = signed(
    "ticker-price",
    Method::Get,
    "/sapi/v1/alpha-trade/market/ticker-price",
    &[Param::query("symbol").required()],
);

pub static AGG_TRADES: Endpoint = signed(
    "agg-trades",
    Method::Get,
    "/sapi/v1/alpha-trade/market/agg-trades",
    &[
        Param::query("symbol").required(),
        Param::query("fromId"),
        Param::query("startTime"),
        Param::query("endTime"),
        Param::query("limit"),
    ],
);

pub static BOOK_TICKER: Endpoint = signed(
    "book-ticker",
    Method::Get,
    "/sapi/v1/alpha-trade/market/book-ticker",
    &[Param::query("symbol").required()],
);

pub static DEPTH: Endpoint = signed(
    "depth",
    Method::Get,
    "/sapi/v1/alpha-trade/market/depth",
    &[Param::query("symbol").required(), Param::query("limit")],
);

// Trading

/// Listen key for the user data stream.
pub static LISTEN_KEY: Endpoint = signed(
    "listen-key",
    Method::Post,
    "/sapi/v1/alpha-trade/get-listen-key",
    &[],
);

/// Places a limit order. Parameters travel in the form body.
pub static PLACE_ORDER: Endpoint = signed(
    "place-order",
    Method::Post,
    "/sapi/v1/alpha-trade/order/place",
    &[
        Param::form("baseAsset").required(),
        Param::form("quoteAsset").required(),
        Param::form("side").required(),
        Param::form("quantity").required(),
        Param::form("price").required(),
        Param::form("clientOrderId"),
        Param::form("walletType"),
    ],
);

pub static CANCEL_ORDER: Endpoint = signed(
    "cancel-order",
    Method::Post,
    "/sapi/v1/alpha-trade/order/cancel",
    &[
        Param::form("symbol").required(),
        Param::form("orderId").required(),
    ],
);

/// Cancels every open order, optionally narrowed to one symbol or base asset.
pub static CANCEL_ALL_ORDERS: Endpoint = signed(
    "cancel-all-orders",
    Method::Post,
    "/sapi/v1/alpha-trade/order/cancel-all",
    &[Param::form("symbol"), Param::form("baseAsset")],
);

pub static OPEN_ORDERS: Endpoint = signed(
    "open-orders",
    Method::Get,
    "/sapi/v1/alpha-trade/order/get-open-order",
    &[Param::query("symbol"), Param::query("side")],
);

pub static ORDER_HISTORY: Endpoint = signed(
    "order-history",
    Method::Get,
    "/sapi/v1/alpha-trade/order/get-order-history",
    &[
        Param::query("baseAsset"),
        Param::query("side"),
        Param::query("orderStatus"),
        Param::query("startTime"),
        Param::query("endTime"),
        Param::query("limit"),
        Param::query("pageId"),
    ],
);

pub static ORDER_DETAIL: Endpoint = signed(
    "order-detail",
    Method::Get,
    "/sapi/v1/alpha-trade/order/get-order-detail",
    &[
        Param::query("symbol").required(),
        Param::query("orderId").required(),
    ],
);

pub static USER_TRADES: Endpoint = signed(
    "user-trades",
    Method::Get,
    "/sapi/v1/alpha-trade/order/get-user-trades",
    &[
        Param::query("baseAsset"),
        Param::query("side"),
        Param::query("orderId"),
        Param::query("startTime"),
        Param::query("endTime"),
        Param::query("limit"),
        Param::query("pageId"),
    ],
);

// Assets

/// Balances held in the alpha wallet.
pub static ALPHA_ASSETS: Endpoint = signed(
    "alpha-assets",
    Method::Get,
    "/sapi/v1/asset/get-alpha-asset",
    &[],
);

pub static TOKEN_MAPPING: Endpoint = signed(
    "token-mapping",
    Method::Get,
    "/sapi/v1/alpha-trade/token/all/list",
    &[],
);

pub static WITHDRAW: Endpoint = signed(
    "withdraw",
    Method::Post,
    "/sapi/v1/capital/alpha-withdraw/apply",
    &[
        Param::form("network").required(),
        Param::form("alphaId").required(),
        Param::form("contractAddress").required(),
        Param::form("address").required(),
        Param::form("addressTag"),
        Param::form("amount").required(),
        Param::form("clientOrderId"),
    ],
);

pub static WITHDRAW_HISTORY: Endpoint = signed(
    "withdraw-history",
    Method::Get,
    "/sapi/v1/capital/alpha-withdraw/history",
    &[
        Param::query("alphaId"),
        Param::query("clientOrderId"),
        Param::query("status"),
        Param::query("startTime"),
        Param::query("endTime"),
        Param::query("offset"),
        Param::query("limit"),
        Param::query("idList"),
    ],
);

pub static DEPOSIT_HISTORY: Endpoint = signed(
    "deposit-history",
    Method::Get,
    "/sapi/v1/capital/alpha-deposit/history",
    &[
        Param::query("alphaId"),
        Param::query("txId"),
        Param::query("status"),
        Param::query("startTime"),
        Param::query("endTime"),
        Param::query("includeSource"),
        Param::query("offset"),
        Param::query("limit"),
    ],
);

pub static DEPOSIT_ADDRESS: Endpoint = signed(
    "deposit-address",
    Method::Get,
    "/sapi/v1/capital/alpha-deposit/address",
    &[Param::query("network").required()],
);

static ENDPOINTS: phf::Map<&'static str, &'static Endpoint> = phf_map! {
    "quote-assets" => &QUOTE_ASSETS,
    "token-info" => &TOKEN_INFO,
    "exchange-info" => &EXCHANGE_INFO,
    "commission-fee" => &COMMISSION_FEE,
    "klines" => &KLINES,
    "ticker" => &TICKER,
    "ticker-price" => &TICKER_PRICE,
    "agg-trades" => &AGG_TRADES,
    "book-ticker" => &BOOK_TICKER,
    "depth" => &DEPTH,
    "listen-key" => &LISTEN_KEY,
    "place-order" => &PLACE_ORDER,
    "cancel-order" => &CANCEL_ORDER,
    "cancel-all-orders" => &CANCEL_ALL_ORDERS,
    "open-orders" => &OPEN_ORDERS,
    "order-history" => &ORDER_HISTORY,
    "order-detail" => &ORDER_DETAIL,
    "user-trades" => &USER_TRADES,
    "alpha-assets" => &ALPHA_ASSETS,
    "token-mapping" => &TOKEN_MAPPING,
    "withdraw" => &WITHDRAW,
    "withdraw-history" => &WITHDRAW_HISTORY,
    "deposit-history" => &DEPOSIT_HISTORY,
    "deposit-address" => &DEPOSIT_ADDRESS,
};

/// Looks up an alpha endpoint by its name, e.g. `"place-order"`.
#[must_use]
pub fn endpoint(name: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.get(name).copied()
}

/// Every alpha endpoint, in no particular order.
pub fn endpoints() -> impl Iterator<Item = &'static Endpoint> {
    ENDPOINTS.values().copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn lookup_by_name_should_succeed() {
        let place_order = endpoint("place-order").expect("place-order");

        assert_eq!(place_order.path, "/sapi/v1/alpha-trade/order/place");
        assert_eq!(place_order.method, Method::Post);
        assert!(endpoint("nope").is_none(), "unknown names are not found");
    }

    #[test]
    fn table_is_consistent() {
        let mut paths = HashSet::new();
        for endpoint in endpoints() {
            assert_eq!(
                super::endpoint(endpoint.name),
                Some(endpoint),
                "{} is registered under another name",
                endpoint.name
            );
            assert_eq!(endpoint.security, SecurityLevel::Signed);
            assert!(
                paths.insert(endpoint.path),
                "duplicate path {}",
                endpoint.path
            );
        }

        assert_eq!(paths.len(), 24);
    }

    #[test]
    fn post_endpoints_take_form_params() {
        for endpoint in endpoints().filter(|e| e.method == Method::Post) {
            assert!(
                endpoint
                    .params
                    .iter()
                    .all(|p| p.location == crate::endpoint::Location::Form),
                "{endpoint} mixes query params into a POST"
            );
        }
    }
}
