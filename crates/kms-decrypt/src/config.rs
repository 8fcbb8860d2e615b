//! Ambient configuration for `kms-decrypt`.
//!
//! Everything the command line does not cover is read from `KMS_DECRYPT_*`
//! environment variables at startup. No credentials are ever read here;
//! those are resolved by the AWS SDK from the selected profile.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable prefix, e.g. `KMS_DECRYPT_LOG_LEVEL`.
const ENV_PREFIX: &str = "KMS_DECRYPT";

/// Log output format written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Validated ambient configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tracing filter directive (e.g. `"warn"`, `"kms_decrypt=debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Override for the KMS endpoint, e.g. a local KMS emulator.
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_log_level() -> String {
    "warn".into()
}
fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            endpoint_url: None,
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(source: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(source)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("{ENV_PREFIX}_LOG_LEVEL must not be empty when set");
        }
        if let Some(url) = &self.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("{ENV_PREFIX}_ENDPOINT_URL must be an http(s) URL, got {url:?}");
            }
        }
        Ok(())
    }
}
