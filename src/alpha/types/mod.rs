//! Enumerations shared by alpha requests and responses.
//!
//! Values the exchange adds after this crate was written deserialize into the `Unknown` variant
//! of each enum, which keeps the raw wire string.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub mod request;
pub mod response;

macro_rules! wire_display {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// The value as sent and received on the wire.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unknown(raw) => raw.as_str(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    #[serde(alias = "buy")]
    Buy,
    #[serde(alias = "sell")]
    Sell,
    /// Unknown side from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

wire_display!(Side { Buy => "BUY", Sell => "SELL" });

#[non_exhaustive]
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    #[default]
    Limit,
    /// Unknown order type from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

wire_display!(OrderType { Limit => "LIMIT" });

#[non_exhaustive]
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good 'til Cancelled; the order rests on the book until filled or cancelled.
    #[default]
    Gtc,
    /// Unknown time in force from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

wire_display!(TimeInForce { Gtc => "GTC" });

#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    /// Unknown order status from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

wire_display!(OrderStatus {
    New => "NEW",
    PartiallyFilled => "PARTIALLY_FILLED",
    Filled => "FILLED",
    Canceled => "CANCELED",
});

/// Wallet an order is funded from.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletType {
    Funding,
    Alpha,
    /// Unknown wallet type from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

wire_display!(WalletType { Funding => "FUNDING", Alpha => "ALPHA" });

/// Candlestick interval.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1s")]
    #[strum(serialize = "1s")]
    OneSecond,
    #[serde(rename = "1m")]
    #[strum(serialize = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    #[strum(serialize = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    #[strum(serialize = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    #[strum(serialize = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    #[strum(serialize = "4h")]
    FourHours,
    #[serde(rename = "6h")]
    #[strum(serialize = "6h")]
    SixHours,
    #[serde(rename = "8h")]
    #[strum(serialize = "8h")]
    EightHours,
    #[serde(rename = "12h")]
    #[strum(serialize = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    #[strum(serialize = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    #[strum(serialize = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    #[strum(serialize = "1w")]
    OneWeek,
    #[serde(rename = "1M")]
    #[strum(serialize = "1M")]
    OneMonth,
}
