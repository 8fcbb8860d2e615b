//! Command-line parsing.
//!
//! Each token is classified into a [`Flag`]. Value flags consume the next
//! token verbatim, even if it looks like another flag. Tokens that are not a
//! recognised flag are skipped one at a time, so `--foo bar -c ABC123==` still
//! sets the cipher.

use common::{DecryptRequest, EncryptionContext};

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Decrypt a base64-encoded KMS ciphertext blob and print the plaintext.

Usage: kms-decrypt -c <CIPHER> -r <REGION> [OPTIONS]

Options:
  -c, --cipher <CIPHER>        Base64-encoded ciphertext blob
  -r, --region <REGION>        AWS region of the KMS key
  -p, --profile <PROFILE>      Credentials profile [default: default]
  -e, --enc-context <VALUE>    Encryption context, sent as Key=<VALUE>
  -k, --key-id <KEY_ID>        KMS key id, ARN, or alias
  -d, --debug                  Enable debug logging on stderr
  -h, --help                   Print help
  -V, --version                Print version

Environment:
  KMS_DECRYPT_LOG_LEVEL        Log filter (default: warn; RUST_LOG overrides)
  KMS_DECRYPT_LOG_FORMAT       text | json (default: text)
  KMS_DECRYPT_ENDPOINT_URL     KMS endpoint override
";

/// A recognised command-line flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Cipher,
    Profile,
    EncContext,
    Region,
    KeyId,
    Debug,
    Help,
    Version,
}

impl Flag {
    /// Classify a token, returning `None` for anything unrecognised.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "-c" | "--cipher" => Flag::Cipher,
            "-p" | "--profile" => Flag::Profile,
            "-e" | "--enc-context" => Flag::EncContext,
            "-r" | "--region" => Flag::Region,
            "-k" | "--key-id" => Flag::KeyId,
            "-d" | "--debug" => Flag::Debug,
            "-h" | "--help" => Flag::Help,
            "-V" | "--version" => Flag::Version,
            _ => return None,
        })
    }

    /// Whether the flag consumes the following token as its value.
    pub fn takes_value(self) -> bool {
        matches!(
            self,
            Flag::Cipher | Flag::Profile | Flag::EncContext | Flag::Region | Flag::KeyId
        )
    }
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Decrypt {
        request: DecryptRequest,
        debug: bool,
        /// Unrecognised tokens, in order, for logging once telemetry is up.
        ignored: Vec<String>,
    },
    Help,
    Version,
}

/// Parse arguments (without the program name) into a [`Command`].
///
/// Never fails: missing values become empty strings and are rejected later,
/// after the parameters have been echoed.
pub fn parse_args<I, S>(argv: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = argv.into_iter().map(Into::into);
    let mut request = DecryptRequest::default();
    let mut debug = false;
    let mut ignored = Vec::new();

    while let Some(token) = tokens.next() {
        let Some(flag) = Flag::from_token(&token) else {
            ignored.push(token);
            continue;
        };

        let value = if flag.takes_value() {
            tokens.next().unwrap_or_default()
        } else {
            String::new()
        };

        match flag {
            Flag::Cipher => request.cipher = value,
            Flag::Profile => request.profile = value,
            Flag::EncContext => request.encryption_context = EncryptionContext::new(value),
            Flag::Region => request.region = value,
            Flag::KeyId => request.key_id = Some(value).filter(|v| !v.is_empty()),
            Flag::Debug => debug = true,
            Flag::Help => return Command::Help,
            Flag::Version => return Command::Version,
        }
    }

    Command::Decrypt {
        request,
        debug,
        ignored,
    }
}
