use std::env;
use std::fmt;

use hmac::{Hmac, Mac as _};
/// Secret string types that redact values in debug output for security.
pub use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;

use crate::Result;
use crate::error::{Error, InvalidSecret};

/// Header carrying the API key on [`SecurityLevel::ApiKey`] and [`SecurityLevel::Signed`] calls.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Environment variable read by [`Credentials::from_env`] for the API key.
pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
/// Environment variable read by [`Credentials::from_env`] for the secret key.
pub const SECRET_KEY_VAR: &str = "BINANCE_SECRET_KEY";

/// What an endpoint requires from the transport before the request can be sent.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecurityLevel {
    /// Public endpoint, no header and no signature.
    #[default]
    None,
    /// The `X-MBX-APIKEY` header is attached.
    ApiKey,
    /// The `X-MBX-APIKEY` header is attached and the query carries `timestamp` and `signature`.
    Signed,
}

impl SecurityLevel {
    #[must_use]
    pub fn requires_api_key(self) -> bool {
        matches!(self, SecurityLevel::ApiKey | SecurityLevel::Signed)
    }

    #[must_use]
    pub fn requires_signature(self) -> bool {
        matches!(self, SecurityLevel::Signed)
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SecurityLevel::None => "NONE",
            SecurityLevel::ApiKey => "API_KEY",
            SecurityLevel::Signed => "SIGNED",
        };
        f.write_str(name)
    }
}

/// API key and secret used to authenticate requests. The secret never appears in `Debug` output.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    #[serde(alias = "apiKey")]
    pub(crate) key: String,
    #[serde(alias = "secretKey")]
    pub(crate) secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new<K: Into<String>, S: Into<String>>(key: K, secret: S) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// Reads the credentials from [`API_KEY_VAR`] and [`SECRET_KEY_VAR`].
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| {
            env::var(name).map_err(|e| Error::validation(format!("{name} is not usable: {e}")))
        };

        Ok(Self::new(read(API_KEY_VAR)?, read(SECRET_KEY_VAR)?))
    }

    /// Returns the API key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the secret.
    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

/// Computes the lowercase hex HMAC-SHA256 of `payload` keyed by `secret`.
pub fn sign(secret: &SecretString, payload: &str) -> Result<String> {
    let key = secret.expose_secret();
    if key.is_empty() {
        return Err(InvalidSecret.into());
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())?;
    mac.update(payload.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}
