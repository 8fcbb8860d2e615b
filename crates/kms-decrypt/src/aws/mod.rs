//! AWS SDK wiring for the KMS `Decrypt` call.
//!
//! Credentials and any region settings of the selected profile are resolved
//! by the standard AWS credential chain; this module only chooses the profile,
//! the region, and (optionally) an endpoint override.

pub mod clients;

pub use clients::KmsDecryptor;
