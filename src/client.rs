use std::time::Duration;

use bon::Builder;
use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Body, Client as ReqwestClient, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::{self, API_KEY_HEADER, Credentials, SecurityLevel};
use crate::endpoint::{Endpoint, EndpointCall};
use crate::error::{Cancelled, Error};
use crate::request::{Method, PendingRequest, RequestOption};
use crate::{Result, Timestamp, serde_helpers};

/// Production REST API host.
pub const MAINNET: &str = "https://api.binance.com";
/// Spot test network REST API host.
pub const TESTNET: &str = "https://testnet.binance.vision";

const DEFAULT_USER_AGENT: &str = "binance-alpha-sdk";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const PING_PATH: &str = "/api/v3/ping";
const TIME_PATH: &str = "/api/v3/time";

/// Configuration for [`Client`]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// API key and secret. Required for [`SecurityLevel::ApiKey`] and [`SecurityLevel::Signed`]
    /// calls.
    credentials: Option<Credentials>,
    /// Milliseconds subtracted from the local clock when timestamping signed requests. See
    /// [`Client::sync_time_offset`].
    #[builder(default)]
    time_offset: i64,
    /// `recvWindow` applied to signed requests that do not set their own.
    recv_window: Option<i64>,
    /// Deadline for a whole call, from connect to the last body byte. Ignored by
    /// [`Client::with_http_client`].
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
    /// Ignored by [`Client::with_http_client`].
    #[builder(into)]
    user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

/// The transport for the exchange's REST API.
///
/// A [`Client`] turns a [`PendingRequest`] into an authenticated HTTP call, sends it and decodes
/// the error envelope. Every call takes `&self`, so a client can be shared between tasks (it is
/// cheap to clone; clones share the connection pool). Methods that change the configuration
/// take `&mut self`: configure before the first concurrent use, or guard the client with a lock
/// of your own.
///
/// ```rust,no_run
/// use binance_alpha_sdk::Result;
/// use binance_alpha_sdk::client::{Client, Config, TESTNET};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let client = Client::new(TESTNET, Config::default())?;
///
///     let server_time = client.server_time(&CancellationToken::new()).await?;
///     println!("Server time: {server_time}");
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    /// The [`Url`] against which requests are made.
    base_url: Url,
    credentials: Option<Credentials>,
    time_offset: i64,
    recv_window: Option<i64>,
    /// The inner [`ReqwestClient`], reused across calls.
    http: ReqwestClient,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(MAINNET, Config::default()).expect("Client with default endpoint should succeed")
    }
}

/// A request after option application, signing and URL composition. Nothing in here is
/// re-encoded before it reaches the wire.
#[derive(Debug)]
pub(crate) struct PreparedRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Vec<u8>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
}

impl ErrorEnvelope {
    fn is_valid(&self) -> bool {
        self.code != 0 || !self.msg.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerTime {
    server_time: Timestamp,
}

impl Client {
    /// Creates a new client against `host`, e.g. [`MAINNET`] or [`TESTNET`].
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid or the HTTP client cannot be initialized.
    pub fn new(host: &str, config: Config) -> Result<Client> {
        let mut headers = HeaderMap::new();

        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let http = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Self::with_http_client(host, config, http)
    }

    /// Creates a new client that sends through an existing [`ReqwestClient`], e.g. one with a
    /// custom TLS configuration or proxy.
    pub fn with_http_client(host: &str, config: Config, http: ReqwestClient) -> Result<Client> {
        Ok(Self {
            base_url: Url::parse(host)?,
            credentials: config.credentials,
            time_offset: config.time_offset,
            recv_window: config.recv_window,
            http,
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Points the client at another host. Takes effect on the next call.
    pub fn set_base_url(&mut self, host: &str) -> Result<()> {
        self.base_url = Url::parse(host)?;
        Ok(())
    }

    #[must_use]
    pub fn time_offset(&self) -> i64 {
        self.time_offset
    }

    pub fn set_time_offset(&mut self, time_offset: i64) {
        self.time_offset = time_offset;
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn set_credentials(&mut self, credentials: Option<Credentials>) {
        self.credentials = credentials;
    }

    pub fn set_recv_window(&mut self, recv_window: Option<i64>) {
        self.recv_window = recv_window;
    }

    /// Starts a call to a declared [`Endpoint`].
    #[must_use]
    pub fn call(&self, endpoint: &'static Endpoint) -> EndpointCall<'_> {
        EndpointCall::new(self, endpoint)
    }

    /// Signs and sends `request`, returning the raw response body.
    ///
    /// `options` are applied to the request, in order, before anything else. Cancelling
    /// `cancel` before the response is fully read aborts the underlying connection and returns
    /// a [`Cancelled`] error; a token that is already cancelled sends nothing.
    ///
    /// # Errors
    ///
    /// * [`Kind::Api`](crate::error::Kind::Api) when the exchange answers with a status of 400 or
    ///   above and a `{code, msg}` envelope
    /// * [`Kind::MalformedResponse`](crate::error::Kind::MalformedResponse) when such a response
    ///   has no usable envelope
    /// * [`Kind::Transport`](crate::error::Kind::Transport) on connection failures, timeouts and
    ///   cancellation
    /// * [`Kind::Signing`](crate::error::Kind::Signing) /
    ///   [`Kind::Validation`](crate::error::Kind::Validation) when the request could not be built
    pub async fn dispatch<I>(
        &self,
        request: PendingRequest,
        cancel: &CancellationToken,
        options: I,
    ) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.execute(request, cancel, options)
            .await
            .map(|(_, body)| body)
    }

    /// Like [`Client::dispatch`], then decodes the body into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`Client::dispatch`] returns, plus
    /// [`Kind::MalformedResponse`](crate::error::Kind::MalformedResponse) with the raw body
    /// attached when it does not decode into `T`.
    pub async fn send<T, I>(
        &self,
        request: PendingRequest,
        cancel: &CancellationToken,
        options: I,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = RequestOption>,
    {
        let path = request.endpoint().to_owned();
        let (status_code, body) = self.execute(request, cancel, options).await?;

        serde_helpers::decode(status_code, path, body)
    }

    /// Tests connectivity to the REST API.
    pub async fn ping(&self, cancel: &CancellationToken) -> Result<()> {
        let request = PendingRequest::new(Method::Get, PING_PATH, SecurityLevel::None);

        self.dispatch(request, cancel, []).await.map(drop)
    }

    /// Returns the exchange's clock, in milliseconds since the Unix epoch.
    pub async fn server_time(&self, cancel: &CancellationToken) -> Result<Timestamp> {
        let request = PendingRequest::new(Method::Get, TIME_PATH, SecurityLevel::None);
        let response: ServerTime = self.send(request, cancel, []).await?;

        Ok(response.server_time)
    }

    /// Measures the drift between the local clock and the exchange and stores it as the time
    /// offset, so that subsequent signed requests carry the exchange's time. Returns the offset.
    pub async fn sync_time_offset(&mut self, cancel: &CancellationToken) -> Result<i64> {
        let server_time = self.server_time(cancel).await?;
        let offset = offset_from(now_millis(), server_time)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(offset, server_time, "synchronized time offset");

        self.time_offset = offset;
        Ok(offset)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self, request, cancel, options),
            fields(
                method = %request.method(),
                path = request.endpoint(),
                security = %request.security(),
                status_code
            )
        )
    )]
    async fn execute<I>(
        &self,
        request: PendingRequest,
        cancel: &CancellationToken,
        options: I,
    ) -> Result<(StatusCode, Vec<u8>)>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        let PreparedRequest {
            method,
            path,
            url,
            headers,
            body,
        } = self.prepare_at(request, options, now_millis())?;

        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }

        let mut http_request = reqwest::Request::new(method.into(), url);
        *http_request.headers_mut() = headers;
        *http_request.body_mut() = body.map(Body::from);

        let exchange = async {
            let response = self.http.execute(http_request).await?;
            let status_code = response.status();
            let body = response.bytes().await?;
            Ok::<_, Error>((status_code, body))
        };

        let (status_code, body) = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("request cancelled");
                return Err(Cancelled.into());
            }
            exchanged = exchange => exchanged?,
        };

        #[cfg(feature = "tracing")]
        tracing::Span::current().record("status_code", status_code.as_u16());

        let body = decode_error(status_code, method, path, body.to_vec())?;
        Ok((status_code, body))
    }

    /// Runs the signing pipeline against the clock reading `now`.
    pub(crate) fn prepare_at<I>(
        &self,
        mut request: PendingRequest,
        options: I,
        now: Timestamp,
    ) -> Result<PreparedRequest>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        for option in options {
            option.apply(&mut request);
        }

        let security = request.security();
        if security.requires_signature() && !request.has_recv_window_override() {
            if let Some(recv_window) = self.recv_window {
                request.set_recv_window(recv_window);
            }
        }

        let mut headers = HeaderMap::new();

        // The form string is only signed when it is also the body that gets sent.
        let mut signed_body = String::new();
        let body = match request.take_body() {
            Some(raw) => Some(raw),
            None => {
                let form = request.form().encode();
                if form.is_empty() {
                    None
                } else {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
                    signed_body = form;
                    Some(signed_body.as_bytes().to_vec())
                }
            }
        };

        if let Some(recv_window) = request.recv_window() {
            request.query_mut().set("recvWindow", recv_window);
        }

        let mut query = request.query().encode();

        match (security, self.credentials.as_ref()) {
            (SecurityLevel::None, _) => {}
            (_, None) => return Err(Error::missing_credentials(security, request.endpoint())),
            (_, Some(credentials)) => {
                headers.insert(API_KEY_HEADER, HeaderValue::from_str(credentials.key())?);

                if security.requires_signature() {
                    let timestamp = now.checked_sub(self.time_offset).ok_or_else(|| {
                        Error::validation(format!(
                            "time offset {} puts the timestamp out of range",
                            self.time_offset
                        ))
                    })?;
                    if !query.is_empty() {
                        query.push('&');
                    }
                    query.push_str("timestamp=");
                    query.push_str(&timestamp.to_string());

                    let payload = format!("{query}{signed_body}");
                    let signature = auth::sign(credentials.secret(), &payload)?;

                    query.push_str("&signature=");
                    query.push_str(&signature);
                }
            }
        }

        let mut url = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.endpoint()
        );
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        Ok(PreparedRequest {
            method: request.method(),
            path: request.endpoint().to_owned(),
            url: Url::parse(&url)?,
            headers,
            body,
        })
    }
}

/// Turns a response with a status of 400 or above into an error; passes every other body through.
fn decode_error(
    status_code: StatusCode,
    method: Method,
    path: String,
    body: Vec<u8>,
) -> Result<Vec<u8>> {
    if status_code.as_u16() < 400 {
        return Ok(body);
    }

    match serde_json::from_slice::<ErrorEnvelope>(&body) {
        Ok(envelope) if envelope.is_valid() => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                status = %status_code,
                method = %method,
                path = %path,
                code = envelope.code,
                message = %envelope.msg,
                "API request failed"
            );

            Err(Error::api_error(
                status_code,
                method,
                path,
                envelope.code,
                envelope.msg,
            ))
        }
        Ok(_) => Err(Error::malformed(
            status_code,
            path,
            body,
            "error response without code or msg",
        )),
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(status = %status_code, method = %method, path = %path, "undecodable error response");

            Err(Error::malformed(status_code, path, body, e.to_string()))
        }
    }
}

/// `now - server_time`, or a malformed response error when the exchange's clock reading cannot
/// be subtracted from ours.
fn offset_from(now: Timestamp, server_time: Timestamp) -> Result<i64> {
    now.checked_sub(server_time).ok_or_else(|| {
        Error::malformed(
            StatusCode::OK,
            TIME_PATH.to_owned(),
            format!(r#"{{"serverTime":{server_time}}}"#).into_bytes(),
            "serverTime is out of range",
        )
    })
}

fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}
