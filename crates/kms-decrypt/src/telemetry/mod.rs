//! Telemetry initialisation for the `kms-decrypt` CLI.
//!
//! Logs go to stderr; stdout is reserved for the parameter echoes and the
//! decrypted plaintext. Plaintext and ciphertext bytes are never logged.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set. `debug` forces the
/// `debug` level regardless of both.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str, format: LogFormat, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
