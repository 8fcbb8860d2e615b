//! KMS client construction and the live [`Decryptor`] implementation.

use aws_config::BehaviorVersion;
use aws_sdk_kms::config::Region;
use aws_sdk_kms::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_kms::primitives::Blob;
use common::DecryptError;
use tracing::debug;

use crate::invoker::{DecryptCall, Decryptor};

/// Decrypts through the real KMS API.
///
/// A client is built per call because profile and region are part of the
/// call itself.
#[derive(Clone, Debug, Default)]
pub struct KmsDecryptor {
    /// Optional KMS endpoint override.
    endpoint_url: Option<String>,
}

impl KmsDecryptor {
    pub fn new(endpoint_url: Option<String>) -> Self {
        Self { endpoint_url }
    }

    /// Build a KMS client for `profile` in `region`.
    pub async fn client(&self, profile: &str, region: &str) -> aws_sdk_kms::Client {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .region(Region::new(region.to_owned()))
            .load()
            .await;

        let mut builder = aws_sdk_kms::config::Builder::from(&config);
        if let Some(url) = &self.endpoint_url {
            debug!(endpoint_url = %url, "overriding KMS endpoint");
            builder = builder.endpoint_url(url);
        }
        aws_sdk_kms::Client::from_conf(builder.build())
    }
}

impl Decryptor for KmsDecryptor {
    async fn decrypt(&self, call: DecryptCall) -> Result<Vec<u8>, DecryptError> {
        let client = self.client(&call.profile, &call.region).await;

        let resp = client
            .decrypt()
            .ciphertext_blob(Blob::new(call.ciphertext_blob))
            .set_encryption_context(call.encryption_context)
            .set_key_id(call.key_id)
            .send()
            .await
            .map_err(kms_error)?;

        if let Some(key_id) = resp.key_id() {
            debug!(key_id = %key_id, "KMS decrypt succeeded");
        }

        resp.plaintext()
            .map(|blob| blob.as_ref().to_vec())
            .ok_or(DecryptError::EmptyPlaintext)
    }
}

/// Convert an SDK error into [`DecryptError::Kms`], keeping the service
/// error code and the full source chain.
fn kms_error<E>(err: E) -> DecryptError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    DecryptError::Kms {
        code: err.code().map(str::to_owned),
        message: DisplayErrorContext(&err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_kms::error::ErrorMetadata;
    use aws_sdk_kms::operation::decrypt::DecryptError as KmsDecryptError;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use common::DecryptRequest;

    use super::*;
    use crate::invoker;

    #[test]
    fn kms_error_keeps_service_code() {
        let meta = ErrorMetadata::builder()
            .code("AccessDeniedException")
            .message("User is not authorized to perform kms:Decrypt")
            .build();
        let err = kms_error(KmsDecryptError::generic(meta));

        assert_eq!(err.exit_code(), 254);
        match err {
            DecryptError::Kms { code, message } => {
                assert_eq!(code.as_deref(), Some("AccessDeniedException"));
                assert!(!message.is_empty());
            }
            other => panic!("expected KMS error, got {other:?}"),
        }
    }

    #[test]
    fn kms_error_without_code() {
        let meta = ErrorMetadata::builder().message("dispatch failure").build();
        let err = kms_error(KmsDecryptError::generic(meta));
        assert!(matches!(err, DecryptError::Kms { code: None, .. }));
    }

    #[tokio::test]
    async fn client_uses_requested_region() {
        let kms = KmsDecryptor::new(Some("http://127.0.0.1:4566".into()));
        let client = kms.client("default", "ap-northeast-1").await;
        let region = client.config().region().map(ToString::to_string);
        assert_eq!(region.as_deref(), Some("ap-northeast-1"));
    }

    /// Encrypts with KMS, then decrypts through the invoker.
    ///
    /// Needs real credentials: `KMS_DECRYPT_TEST_KEY_ID`, `AWS_REGION`, and
    /// optionally `KMS_DECRYPT_TEST_PROFILE`.
    #[tokio::test]
    #[ignore]
    async fn live_round_trip() {
        let key_id = std::env::var("KMS_DECRYPT_TEST_KEY_ID").expect("KMS_DECRYPT_TEST_KEY_ID");
        let region = std::env::var("AWS_REGION").expect("AWS_REGION");
        let profile =
            std::env::var("KMS_DECRYPT_TEST_PROFILE").unwrap_or_else(|_| "default".into());
        let plaintext = b"round-trip \x00\x01\xfe payload".to_vec();

        let kms = KmsDecryptor::default();
        let encrypted = kms
            .client(&profile, &region)
            .await
            .encrypt()
            .key_id(key_id)
            .plaintext(Blob::new(plaintext.clone()))
            .encryption_context("Key", "round-trip-test")
            .send()
            .await
            .unwrap();
        let blob = encrypted.ciphertext_blob().unwrap();

        let request = DecryptRequest {
            cipher: STANDARD.encode(blob.as_ref()),
            profile,
            region,
            encryption_context: common::EncryptionContext::new("round-trip-test"),
            key_id: None,
        };
        let decrypted = invoker::invoke(request, &kms).await.unwrap();
        assert_eq!(decrypted, plaintext);
    }
}
