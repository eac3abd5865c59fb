//! Declarative endpoint descriptors.
//!
//! An [`Endpoint`] names everything the transport needs to know about one REST operation: its
//! method, path, [`SecurityLevel`] and the parameters it accepts. Calls are then assembled with
//! the generic [`EndpointCall`] builder returned by [`Client::call`], which routes every
//! parameter to the query string or the form body as the descriptor says and rejects names the
//! descriptor does not list.
//!
//! ```rust,no_run
//! use binance_alpha_sdk::Result;
//! use binance_alpha_sdk::auth::SecurityLevel;
//! use binance_alpha_sdk::client::{Client, Config};
//! use binance_alpha_sdk::endpoint::{Endpoint, Param};
//! use binance_alpha_sdk::request::Method;
//! use tokio_util::sync::CancellationToken;
//!
//! static DEPTH: Endpoint = Endpoint::new(
//!     "depth",
//!     Method::Get,
//!     "/api/v3/depth",
//!     SecurityLevel::None,
//!     &[Param::query("symbol").required(), Param::query("limit")],
//! );
//!
//! # async fn run() -> Result<()> {
//! let client = Client::new("https://api.binance.com", Config::default())?;
//! let body = client
//!     .call(&DEPTH)
//!     .param("symbol", "BTCUSDT")
//!     .param("limit", 5)
//!     .send_raw(&CancellationToken::new())
//!     .await?;
//! # drop(body);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

use crate::Result;
use crate::auth::SecurityLevel;
use crate::client::Client;
use crate::error::{Error, Kind};
use crate::request::{Method, PendingRequest, RequestOption};

/// Where a parameter travels.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Query,
    /// `application/x-www-form-urlencoded` body
    Form,
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub location: Location,
    pub required: bool,
}

impl Param {
    #[must_use]
    pub const fn query(name: &'static str) -> Self {
        Self {
            name,
            location: Location::Query,
            required: false,
        }
    }

    #[must_use]
    pub const fn form(name: &'static str) -> Self {
        Self {
            name,
            location: Location::Form,
            required: false,
        }
    }

    #[must_use]
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// Static description of one REST operation.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// Stable kebab-case identifier, e.g. `place-order`
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub security: SecurityLevel,
    pub params: &'static [Param],
}

impl Endpoint {
    #[must_use]
    pub const fn new(
        name: &'static str,
        method: Method,
        path: &'static str,
        security: SecurityLevel,
        params: &'static [Param],
    ) -> Self {
        Self {
            name,
            method,
            path,
            security,
            params,
        }
    }

    /// Returns the declared parameter called `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&'static Param> {
        self.params.iter().find(|param| param.name == name)
    }

    /// An empty [`PendingRequest`] for this endpoint.
    #[must_use]
    pub fn request(&self) -> PendingRequest {
        PendingRequest::new(self.method, self.path, self.security)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.method, self.path)
    }
}

/// Builder for a single call to an [`Endpoint`]. Created by [`Client::call`].
///
/// Misuse (an undeclared parameter name, a missing required parameter) is reported when the
/// call is sent or converted with [`EndpointCall::into_request`]; nothing reaches the network.
#[must_use = "an endpoint call does nothing until it is sent"]
#[derive(Debug)]
pub struct EndpointCall<'client> {
    client: &'client Client,
    endpoint: &'static Endpoint,
    request: PendingRequest,
    options: Vec<RequestOption>,
    unknown: Vec<String>,
}

impl<'client> EndpointCall<'client> {
    pub(crate) fn new(client: &'client Client, endpoint: &'static Endpoint) -> Self {
        Self {
            client,
            endpoint,
            request: endpoint.request(),
            options: Vec::new(),
            unknown: Vec::new(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &'static Endpoint {
        self.endpoint
    }

    /// Sets `name` to `value`, replacing any earlier value.
    pub fn param<V: fmt::Display>(mut self, name: &str, value: V) -> Self {
        match self.endpoint.param(name) {
            Some(Param {
                location: Location::Query,
                ..
            }) => {
                self.request.set_param(name, value);
            }
            Some(Param {
                location: Location::Form,
                ..
            }) => {
                self.request.set_form_param(name, value);
            }
            None => self.unknown.push(name.to_owned()),
        }
        self
    }

    /// Appends `value` to the values of `name`, for parameters that may repeat.
    pub fn add_param<V: fmt::Display>(mut self, name: &str, value: V) -> Self {
        match self.endpoint.param(name) {
            Some(Param {
                location: Location::Query,
                ..
            }) => {
                self.request.add_param(name, value);
            }
            Some(Param {
                location: Location::Form,
                ..
            }) => {
                self.request.add_form_param(name, value);
            }
            None => self.unknown.push(name.to_owned()),
        }
        self
    }

    /// Sets `name` only when `value` is `Some`.
    pub fn optional_param<V: fmt::Display>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Sets every field of `params`, as serialized by `serde_html_form`. `None` fields are
    /// skipped and sequences become repeated keys.
    pub fn params<P: Serialize + ?Sized>(mut self, params: &P) -> Result<Self> {
        let encoded =
            serde_html_form::to_string(params).map_err(|e| Error::with_source(Kind::Validation, e))?;

        let mut seen = HashSet::new();
        for (name, value) in form_urlencoded::parse(encoded.as_bytes()) {
            self = if seen.insert(name.clone()) {
                self.param(&name, value)
            } else {
                self.add_param(&name, value)
            };
        }

        Ok(self)
    }

    pub fn recv_window(mut self, recv_window: i64) -> Self {
        self.request.set_recv_window(recv_window);
        self
    }

    /// Sends `body` verbatim instead of the form parameters.
    pub fn body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.request.set_body(body);
        self
    }

    pub fn option(mut self, option: RequestOption) -> Self {
        self.options.push(option);
        self
    }

    /// Validates the parameters against the descriptor and returns the request and the options
    /// collected so far.
    pub fn into_request(self) -> Result<(PendingRequest, Vec<RequestOption>)> {
        if !self.unknown.is_empty() {
            return Err(Error::validation(format!(
                "{} does not accept parameter(s) {}",
                self.endpoint,
                self.unknown.join(", ")
            )));
        }

        let missing: Vec<&str> = self
            .endpoint
            .params
            .iter()
            .filter(|param| param.required)
            .filter(|param| {
                let params = match param.location {
                    Location::Query => self.request.query(),
                    Location::Form => self.request.form(),
                };
                !params.contains_key(param.name)
            })
            .map(|param| param.name)
            .collect();

        if !missing.is_empty() {
            return Err(Error::validation(format!(
                "{} requires parameter(s) {}",
                self.endpoint,
                missing.join(", ")
            )));
        }

        Ok((self.request, self.options))
    }

    /// Sends the call and returns the raw response body.
    pub async fn send_raw(self, cancel: &CancellationToken) -> Result<Vec<u8>> {
        let client = self.client;
        let (request, options) = self.into_request()?;

        client.dispatch(request, cancel, options).await
    }

    /// Sends the call and decodes the response into `T`.
    pub async fn send<T: DeserializeOwned>(self, cancel: &CancellationToken) -> Result<T> {
        let client = self.client;
        let (request, options) = self.into_request()?;

        client.send(request, cancel, options).await
    }
}
