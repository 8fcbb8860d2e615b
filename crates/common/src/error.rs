//! Common error types shared across crates.

use thiserror::Error;

/// Top-level error type for a single decrypt invocation.
///
/// Variants map to process exit codes that follow the AWS CLI's own return
/// codes, so scripts written against `aws kms decrypt` keep working:
/// - [`DecryptError::MissingInput`] → 252
/// - [`DecryptError::Config`] → 253
/// - [`DecryptError::Kms`] → 254
/// - everything else → 255
#[derive(Debug, Error)]
pub enum DecryptError {
    /// A required flag (`--cipher`, `--region`) was absent or empty.
    #[error("missing required input: --{0} must be provided")]
    MissingInput(&'static str),

    /// Ambient configuration could not be loaded or failed validation.
    #[error("configuration invalid: {0}")]
    Config(String),

    /// The `--cipher` value is not valid base64.
    #[error("ciphertext is not valid base64: {0}")]
    InvalidCiphertext(String),

    /// KMS rejected the request or could not be reached.
    #[error("KMS decrypt failed{}: {message}", .code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    Kms {
        /// Service error code, e.g. `InvalidCiphertextException`.
        code: Option<String>,
        /// Full error chain as rendered by the SDK.
        message: String,
    },

    /// KMS answered successfully but without a plaintext blob.
    #[error("KMS decrypt response contained no plaintext")]
    EmptyPlaintext,

    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl DecryptError {
    /// Returns the process exit code that should be used for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DecryptError::MissingInput(_) => 252,
            DecryptError::Config(_) => 253,
            DecryptError::Kms { .. } => 254,
            DecryptError::InvalidCiphertext(_)
            | DecryptError::EmptyPlaintext
            | DecryptError::Output(_) => 255,
        }
    }
}
