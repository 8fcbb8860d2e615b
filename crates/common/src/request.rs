//! The parsed form of a single decrypt invocation.

use std::collections::HashMap;

/// Credentials profile used when `--profile` is not given.
pub const DEFAULT_PROFILE: &str = "default";

/// Encryption-context map key under which the `--enc-context` value is sent.
pub const CONTEXT_KEY: &str = "Key";

/// Options resolved from the command line. Built once by the parser and
/// passed by value into the invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptRequest {
    /// Base64-encoded ciphertext blob.
    pub cipher: String,
    /// Named credentials profile.
    pub profile: String,
    /// Target region. Not defaulted: an empty value is rejected before the call.
    pub region: String,
    /// Optional single-entry encryption context.
    pub encryption_context: Option<EncryptionContext>,
    /// Optional KMS key id, ARN, or alias.
    pub key_id: Option<String>,
}

impl Default for DecryptRequest {
    fn default() -> Self {
        Self {
            cipher: String::new(),
            profile: DEFAULT_PROFILE.into(),
            region: String::new(),
            encryption_context: None,
            key_id: None,
        }
    }
}

/// A single encryption-context value, sent to KMS as `{"Key": <value>}`.
///
/// Never empty: use [`EncryptionContext::new`], which maps an empty value to
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionContext(String);

impl EncryptionContext {
    /// Wrap a context value, returning `None` for the empty string.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!value.is_empty()).then_some(Self(value))
    }

    /// The raw value as supplied on the command line.
    pub fn value(&self) -> &str {
        &self.0
    }

    /// The `Key=<value>` shorthand accepted by `aws kms decrypt --encryption-context`.
    pub fn as_argument(&self) -> String {
        format!("{CONTEXT_KEY}={}", self.0)
    }

    /// The map form sent in the `EncryptionContext` request field.
    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([(CONTEXT_KEY.to_owned(), self.0.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_uses_default_profile() {
        let req = DecryptRequest::default();
        assert_eq!(req.profile, DEFAULT_PROFILE);
        assert!(req.cipher.is_empty());
        assert!(req.region.is_empty());
        assert!(req.encryption_context.is_none());
        assert!(req.key_id.is_none());
    }

    #[test]
    fn empty_context_is_absent() {
        assert!(EncryptionContext::new("").is_none());
    }

    #[test]
    fn context_argument_is_key_equals_value() {
        let ctx = EncryptionContext::new("payments-prod").unwrap();
        assert_eq!(ctx.as_argument(), "Key=payments-prod");
        assert_eq!(ctx.value(), "payments-prod");
    }

    #[test]
    fn context_argument_keeps_value_verbatim() {
        let ctx = EncryptionContext::new("a=b c").unwrap();
        assert_eq!(ctx.as_argument(), "Key=a=b c");
    }

    #[test]
    fn context_map_has_single_entry() {
        let map = EncryptionContext::new("tenant-7").unwrap().to_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Key").map(String::as_str), Some("tenant-7"));
    }
}
