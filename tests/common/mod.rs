#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Not every test binary uses every helper"
)]

use binance_alpha_sdk::auth::Credentials;
use binance_alpha_sdk::client::{Client, Config};
use httpmock::MockServer;

pub const API_KEY: &str = "testkey";
pub const SECRET: &str = "testsecret";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client without credentials, pointed at the mock server.
pub fn public_client(server: &MockServer) -> anyhow::Result<Client> {
    Ok(Client::new(&server.base_url(), Config::default())?)
}

/// Client with [`API_KEY`] / [`SECRET`] credentials, pointed at the mock server.
pub fn authenticated_client(server: &MockServer) -> anyhow::Result<Client> {
    let config = Config::builder()
        .credentials(Credentials::new(API_KEY, SECRET))
        .build();

    Ok(Client::new(&server.base_url(), config)?)
}
