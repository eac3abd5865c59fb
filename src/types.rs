//! Re-exported types from external crates for convenience.
//!
//! These types are commonly used in this SDK and are re-exported here
//! so users don't need to add these dependencies to their `Cargo.toml`.

/// Date and time types for converting the millisecond timestamps in API responses.
pub use chrono::{DateTime, Utc};
/// Arbitrary precision decimal type for prices, quantities, and amounts.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use binance_alpha_sdk::types::dec;
/// let price = dec!(0.55);
/// ```
pub use rust_decimal_macros::dec;
/// Token passed to every call; cancelling it aborts the call.
pub use tokio_util::sync::CancellationToken;
