use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use hmac::digest::InvalidLength;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;
use reqwest::header;

use crate::auth::SecurityLevel;
use crate::request::Method;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Connection, DNS, timeout or cancellation failure. Never retried.
    Transport,
    /// Non-successful HTTP call carrying a `{code, msg}` envelope
    Api,
    /// Response body that could not be decoded into the expected shape
    MalformedResponse,
    /// The request signature could not be computed
    Signing,
    /// Invalid input detected before anything was sent
    Validation,
    /// Internal error from dependencies
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    /// Returns `true` if the call was aborted through its cancellation token.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.downcast_ref::<Cancelled>().is_some()
    }

    /// Returns the exchange error envelope, if this is an [`Kind::Api`] error.
    #[must_use]
    pub fn api(&self) -> Option<&Api> {
        self.downcast_ref::<Api>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn api_error<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        code: i64,
        message: S,
    ) -> Self {
        Api {
            status_code,
            method,
            path,
            code,
            message: message.into(),
        }
        .into()
    }

    pub fn malformed<S: Into<String>>(
        status_code: StatusCode,
        path: String,
        body: Vec<u8>,
        reason: S,
    ) -> Self {
        MalformedResponse {
            status_code,
            path,
            body,
            reason: reason.into(),
        }
        .into()
    }

    #[must_use]
    pub fn missing_credentials(security: SecurityLevel, path: &str) -> Self {
        MissingCredentials {
            security,
            path: path.to_owned(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Error envelope returned by the exchange alongside a status code of 400 or above.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Api {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    /// Exchange-specific error code, e.g. `-1121` for an invalid symbol
    pub code: i64,
    pub message: String,
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {}: code={}, msg={}",
            self.status_code, self.method, self.path, self.code, self.message
        )
    }
}

impl StdError for Api {}

/// A response whose body did not decode into the expected shape. The raw bytes are kept for
/// diagnostics.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct MalformedResponse {
    pub status_code: StatusCode,
    pub path: String,
    pub body: Vec<u8>,
    pub reason: String,
}

impl MalformedResponse {
    /// The raw body, lossily decoded as UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl fmt::Display for MalformedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed response({}) from {} ({}): {}",
            self.status_code,
            self.path,
            self.reason,
            self.body_text()
        )
    }
}

impl StdError for MalformedResponse {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request cancelled before a response was received")
    }
}

impl StdError for Cancelled {}

#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct MissingCredentials {
    pub security: SecurityLevel,
    pub path: String,
}

impl fmt::Display for MissingCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "credentials are required for {} endpoint {}",
            self.security, self.path
        )
    }
}

impl StdError for MissingCredentials {}

/// The secret key cannot be used to compute a signature.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct InvalidSecret;

impl fmt::Display for InvalidSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secret key is empty")
    }
}

impl StdError for InvalidSecret {}

impl From<Api> for Error {
    fn from(err: Api) -> Self {
        Error::with_source(Kind::Api, err)
    }
}

impl From<MalformedResponse> for Error {
    fn from(err: MalformedResponse) -> Self {
        Error::with_source(Kind::MalformedResponse, err)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Cancelled> for Error {
    fn from(err: Cancelled) -> Self {
        Error::with_source(Kind::Transport, err)
    }
}

impl From<MissingCredentials> for Error {
    fn from(err: MissingCredentials) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<InvalidSecret> for Error {
    fn from(err: InvalidSecret) -> Self {
        Error::with_source(Kind::Signing, err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Error::with_source(Kind::Internal, e)
        } else {
            Error::with_source(Kind::Transport, e)
        }
    }
}

impl From<header::InvalidHeaderValue> for Error {
    fn from(e: header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<InvalidLength> for Error {
    fn from(e: InvalidLength) -> Self {
        Error::with_source(Kind::Signing, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}
