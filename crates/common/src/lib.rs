//! Common types and errors shared across `kms-decrypt` crates.

pub mod error;
pub mod request;

pub use error::DecryptError;
pub use request::{DecryptRequest, EncryptionContext, DEFAULT_PROFILE};
