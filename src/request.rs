//! In-memory description of a single, not-yet-sent API call.
//!
//! A [`PendingRequest`] is created with a fixed [`Method`], endpoint path and [`SecurityLevel`],
//! populated through its chaining setters, and then consumed by
//! [`Client::dispatch`](crate::client::Client::dispatch). Nothing here validates parameter
//! values: every value is rendered through its [`Display`](fmt::Display) form, which matches the
//! literals the exchange expects (`true`/`false`, plain decimal numbers).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

use crate::auth::SecurityLevel;

/// The HTTP methods used by the exchange's REST API.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Multi-valued parameter map.
///
/// Keys are kept in ascending order so that [`Params::encode`] is canonical; values under one
/// key keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, Vec<String>>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every value stored under `key` with `value`.
    pub fn set<K: Into<String>, V: fmt::Display>(&mut self, key: K, value: V) -> &mut Self {
        self.entries.insert(key.into(), vec![value.to_string()]);
        self
    }

    /// Appends `value` to the values stored under `key`.
    pub fn add<K: Into<String>, V: fmt::Display>(&mut self, key: K, value: V) -> &mut Self {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over every `(key, value)` pair in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.as_str(), value.as_str()))
        })
    }

    /// Encodes the map as `application/x-www-form-urlencoded`. Returns an empty string when no
    /// parameters are set.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

/// A pending HTTP call: method, endpoint, parameters and security requirement.
///
/// `method`, `endpoint` and `security` are fixed at construction; only the parameter maps, the
/// `recvWindow` override and the raw body can change before dispatch.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    method: Method,
    endpoint: Cow<'static, str>,
    security: SecurityLevel,
    query: Params,
    form: Params,
    recv_window: Option<i64>,
    body: Option<Vec<u8>>,
}

impl PendingRequest {
    #[must_use]
    pub fn new<E: Into<Cow<'static, str>>>(
        method: Method,
        endpoint: E,
        security: SecurityLevel,
    ) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            security,
            query: Params::new(),
            form: Params::new(),
            recv_window: None,
            body: None,
        }
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn security(&self) -> SecurityLevel {
        self.security
    }

    #[must_use]
    pub fn query(&self) -> &Params {
        &self.query
    }

    #[must_use]
    pub fn form(&self) -> &Params {
        &self.form
    }

    /// The `recvWindow` that will be sent. Zero or negative overrides count as unset.
    #[must_use]
    pub fn recv_window(&self) -> Option<i64> {
        self.recv_window.filter(|window| *window > 0)
    }

    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn set_param<K: Into<String>, V: fmt::Display>(&mut self, key: K, value: V) -> &mut Self {
        self.query.set(key, value);
        self
    }

    pub fn add_param<K: Into<String>, V: fmt::Display>(&mut self, key: K, value: V) -> &mut Self {
        self.query.add(key, value);
        self
    }

    pub fn set_params<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        for (key, value) in params {
            self.query.set(key, value);
        }
        self
    }

    pub fn set_form_param<K: Into<String>, V: fmt::Display>(
        &mut self,
        key: K,
        value: V,
    ) -> &mut Self {
        self.form.set(key, value);
        self
    }

    pub fn add_form_param<K: Into<String>, V: fmt::Display>(
        &mut self,
        key: K,
        value: V,
    ) -> &mut Self {
        self.form.add(key, value);
        self
    }

    pub fn set_form_params<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        for (key, value) in params {
            self.form.set(key, value);
        }
        self
    }

    pub fn set_recv_window(&mut self, recv_window: i64) -> &mut Self {
        self.recv_window = Some(recv_window);
        self
    }

    /// Sets a raw body. When present it is sent verbatim instead of the encoded form parameters,
    /// and no `Content-Type` is inferred.
    ///
    /// Form parameters set alongside a raw body are dropped from the signature as well: the
    /// signed payload is the query plus the body string only when that body is the encoded form.
    /// Clients that sign the encoded form unconditionally produce a different signature for the
    /// same request.
    pub fn set_body<B: Into<Vec<u8>>>(&mut self, body: B) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    pub(crate) fn has_recv_window_override(&self) -> bool {
        self.recv_window.is_some()
    }

    pub(crate) fn query_mut(&mut self) -> &mut Params {
        &mut self.query
    }

    pub(crate) fn take_body(&mut self) -> Option<Vec<u8>> {
        self.body.take()
    }
}

type Modifier = Box<dyn FnOnce(&mut PendingRequest) + Send + 'static>;

/// A late-bound modifier applied to a [`PendingRequest`] right before it is signed.
///
/// Options are applied in the order they are given, so later options win.
///
/// ```
/// use binance_alpha_sdk::request::RequestOption;
///
/// let options = vec![RequestOption::recv_window(5_000)];
/// # drop(options);
/// ```
pub struct RequestOption(Modifier);

impl RequestOption {
    pub fn new<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut PendingRequest) + Send + 'static,
    {
        Self(Box::new(modifier))
    }

    /// Overrides the `recvWindow` (in milliseconds) of the request.
    #[must_use]
    pub fn recv_window(recv_window: i64) -> Self {
        Self::new(move |request| {
            request.set_recv_window(recv_window);
        })
    }

    pub(crate) fn apply(self, request: &mut PendingRequest) {
        (self.0)(request);
    }
}

impl fmt::Debug for RequestOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestOption(..)")
    }
}
