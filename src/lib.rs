#![cfg_attr(doc, doc = include_str!("../README.md"))]

#[cfg(feature = "alpha")]
pub mod alpha;
pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod request;
pub(crate) mod serde_helpers;
pub mod types;

use crate::error::Error;

pub use crate::client::{MAINNET, TESTNET};

pub type Result<T> = std::result::Result<T, Error>;

/// Timestamp in milliseconds since [`std::time::UNIX_EPOCH`]
pub type Timestamp = i64;
