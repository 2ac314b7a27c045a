//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use crate::stripe::StripeClient;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The Stripe secret key was not found anywhere.
    #[error("STRIPE_SECRET_KEY is not set and no .secrets/stripe.json was found")]
    MissingStripeKey,

    /// A numeric variable could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Host to bind (default: "0.0.0.0").
    pub host: String,

    /// Port to listen on (default: 3000).
    pub port: u16,

    /// Stripe secret API key.
    pub stripe_secret_key: String,

    /// Stripe API base URL (default: `<https://api.stripe.com/v1>`).
    pub stripe_api_base: String,

    /// CORS allowed origins. `*` allows any origin.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    pub fn from_env() -> Result<Self, ConfigError> {
        let stripe_secret_key = load_stripe_secret().ok_or(ConfigError::MissingStripeKey)?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_env("PORT")?.unwrap_or(3000),
            stripe_secret_key,
            stripe_api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| StripeClient::BASE_URL.into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_body_bytes: parse_env("MAX_BODY_BYTES")?.unwrap_or(1024 * 1024), // 1MB
        })
    }

    /// Socket address to bind, as `host:port`.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse an optional numeric environment variable.
fn parse_env<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(None),
    }
}

/// Load the Stripe secret key from environment or a secrets file.
fn load_stripe_secret() -> Option<String> {
    if let Ok(key) = std::env::var("STRIPE_SECRET_KEY") {
        if !key.is_empty() {
            return Some(key);
        }
    }

    let secret_paths = [".secrets/stripe.json", "../.secrets/stripe.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<StripeSecrets>(Path::new(path)) {
            tracing::info!(path = %path, "Loaded Stripe secrets from file");
            return Some(secrets.api_key);
        }
    }

    None
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, std::io::Error> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            stripe_secret_key: String::new(),
            stripe_api_base: StripeClient::BASE_URL.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
        }
    }
}
