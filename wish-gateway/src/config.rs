//! Process configuration loaded from the environment at startup.
//!
//! `JWT_SECRET` is required and must be at least [`MIN_SECRET_CHARS`]
//! characters long; the process refuses to start otherwise. Every other
//! setting has a default and may be overridden with a `WISHLIST_` variable:
//!
//! | variable                          | default          |
//! |-----------------------------------|------------------|
//! | `WISHLIST_LISTEN_ADDR`            | `127.0.0.1:8000` |
//! | `WISHLIST_MAX_UPLOAD_BYTES`       | 5 MiB            |
//! | `WISHLIST_SKIP_SIGNATURE_CHECK`   | `false`          |

use std::fmt;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use wish_upload::{SignatureCheck, UploadConfig, DEFAULT_MAX_SIZE};

/// Shortest secret the service accepts, in characters.
pub const MIN_SECRET_CHARS: usize = 16;

/// Errors that prevent the service from starting.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `JWT_SECRET` is unset or empty.
    #[error("JWT_SECRET missing")]
    MissingSecret,

    /// `JWT_SECRET` is shorter than [`MIN_SECRET_CHARS`].
    #[error("JWT_SECRET too short: {length} characters, need at least {MIN_SECRET_CHARS}")]
    SecretTooShort { length: usize },

    /// A setting could not be parsed.
    #[error("invalid configuration: {0}")]
    Extract(#[from] figment::Error),
}

/// A secret value whose content never appears in logs.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    /// Wrap `value` after checking its length.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSecret`] for an empty value and
    /// [`ConfigError::SecretTooShort`] below [`MIN_SECRET_CHARS`].
    pub fn new(value: String) -> Result<Self, ConfigError> {
        let length = value.chars().count();
        if length == 0 {
            return Err(ConfigError::MissingSecret);
        }
        if length < MIN_SECRET_CHARS {
            return Err(ConfigError::SecretTooShort { length });
        }
        Ok(Self(value))
    }

    /// Length of the secret in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<redacted, {} chars>)", self.len())
    }
}

const SECRET_KEY: &str = "jwt_secret";

#[derive(Debug, Serialize, Deserialize)]
struct RawSettings {
    listen_addr: String,
    jwt_secret: Option<String>,
    max_upload_bytes: u64,
    skip_signature_check: bool,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_owned(),
            jwt_secret: None,
            max_upload_bytes: DEFAULT_MAX_SIZE,
            skip_signature_check: false,
        }
    }
}

/// Validated service settings.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Settings {
    /// Socket address the HTTP server binds to.
    pub listen_addr: String,
    /// Signing secret. Only its length is ever exposed.
    pub secret: Secret,
    /// Upload pipeline limits and signature mode.
    pub upload: UploadConfig,
}

impl Settings {
    /// Layered configuration sources: defaults, then `WISHLIST_*`, then
    /// the bare `JWT_SECRET` variable.
    ///
    /// The secret is merged as the verbatim variable value. Going through
    /// figment's env parsing would trim it and turn secrets that look like
    /// numbers, booleans or arrays into non-string values.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RawSettings::default()))
            .merge(Env::prefixed("WISHLIST_").ignore(&[SECRET_KEY]));
        let prefixed = Env::prefixed("WISHLIST_").only(&[SECRET_KEY]);
        let bare = Env::raw().only(&[SECRET_KEY]);
        for (_, value) in prefixed.iter().chain(bare.iter()) {
            figment = figment.merge(Serialized::default(SECRET_KEY, value));
        }
        figment
    }

    /// Load settings from the process environment.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the secret is missing or too short, or a
    /// setting cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and validate settings from an explicit figment.
    ///
    /// # Errors
    /// See [`Settings::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let raw: RawSettings = figment.extract()?;
        let secret = Secret::new(raw.jwt_secret.ok_or(ConfigError::MissingSecret)?)?;
        let signature_check = if raw.skip_signature_check {
            SignatureCheck::Disabled
        } else {
            SignatureCheck::Enforced
        };
        Ok(Self {
            listen_addr: raw.listen_addr,
            secret,
            upload: UploadConfig::new(raw.max_upload_bytes, signature_check),
        })
    }
}
