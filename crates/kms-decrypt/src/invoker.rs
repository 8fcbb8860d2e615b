//! The decrypt pipeline: echo parameters, build the KMS call, invoke it, and
//! write the plaintext.

use std::collections::HashMap;
use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{DecryptError, DecryptRequest, EncryptionContext};
use tracing::{debug, warn};

/// Arguments of one KMS `Decrypt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptCall {
    pub profile: String,
    pub region: String,
    /// Raw ciphertext bytes, already decoded from base64.
    pub ciphertext_blob: Vec<u8>,
    /// `None` means the field is left out of the request entirely.
    pub encryption_context: Option<HashMap<String, String>>,
    pub key_id: Option<String>,
}

/// Something that can perform a KMS decrypt.
#[allow(async_fn_in_trait)]
pub trait Decryptor {
    /// Decrypt `call.ciphertext_blob`, returning the raw plaintext bytes.
    async fn decrypt(&self, call: DecryptCall) -> Result<Vec<u8>, DecryptError>;
}

/// Render the encryption-context argument, or an empty string when there is
/// no context.
pub fn build_context_argument(encryption_context: Option<&EncryptionContext>) -> String {
    match encryption_context {
        Some(ctx) => ctx.as_argument(),
        None => {
            warn!("no encryption context supplied");
            String::new()
        }
    }
}

/// Build the call arguments for `request`.
///
/// # Errors
///
/// Returns [`DecryptError::InvalidCiphertext`] if `cipher` is not valid base64.
pub fn build_call(request: DecryptRequest) -> Result<DecryptCall, DecryptError> {
    let ciphertext_blob = STANDARD
        .decode(request.cipher.trim())
        .map_err(|e| DecryptError::InvalidCiphertext(e.to_string()))?;

    Ok(DecryptCall {
        profile: request.profile,
        region: request.region,
        ciphertext_blob,
        encryption_context: request.encryption_context.as_ref().map(EncryptionContext::to_map),
        key_id: request.key_id,
    })
}

/// Build the call for `request` and hand it to `decryptor`.
pub async fn invoke<D: Decryptor>(
    request: DecryptRequest,
    decryptor: &D,
) -> Result<Vec<u8>, DecryptError> {
    let call = build_call(request)?;
    debug!(
        profile = %call.profile,
        region = %call.region,
        blob_len = call.ciphertext_blob.len(),
        with_context = call.encryption_context.is_some(),
        "calling KMS Decrypt"
    );
    decryptor.decrypt(call).await
}

/// Run one invocation: echo the resolved parameters to `out`, then decrypt
/// and write the plaintext followed by a newline.
///
/// `decryptor` is `Err` when startup (configuration, logging) failed. The
/// echoes are written before that error or any validation is surfaced, so a
/// failing run still shows what it was called with.
pub async fn run<D, W>(
    request: DecryptRequest,
    decryptor: Result<&D, DecryptError>,
    out: &mut W,
) -> Result<(), DecryptError>
where
    D: Decryptor,
    W: Write,
{
    echo_parameters(&request, out)?;

    let decryptor = decryptor?;
    ensure_present(&request.cipher, "cipher")?;
    ensure_present(&request.region, "region")?;

    let plaintext = invoke(request, decryptor).await?;
    out.write_all(&plaintext)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Write one `name: value` line per resolved parameter.
fn echo_parameters<W: Write>(request: &DecryptRequest, out: &mut W) -> Result<(), DecryptError> {
    let context_argument = build_context_argument(request.encryption_context.as_ref());
    let context_value = request
        .encryption_context
        .as_ref()
        .map(EncryptionContext::value)
        .unwrap_or_default();

    writeln!(out, "cipher: {}", request.cipher)?;
    writeln!(out, "region: {}", request.region)?;
    writeln!(out, "profile: {}", request.profile)?;
    writeln!(out, "encryption context: {context_value}")?;
    writeln!(out, "context argument: {context_argument}")?;
    out.flush()?;
    Ok(())
}

fn ensure_present(value: &str, flag: &'static str) -> Result<(), DecryptError> {
    if value.trim().is_empty() {
        return Err(DecryptError::MissingInput(flag));
    }
    Ok(())
}
