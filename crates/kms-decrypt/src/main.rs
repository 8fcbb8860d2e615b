//! `kms-decrypt` — binary entry point.
//!
//! Startup sequence:
//! 1. Parse the command line into a [`DecryptRequest`](common::DecryptRequest).
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise logging on stderr.
//! 4. Echo the parameters, then surface any startup error, or call KMS
//!    `Decrypt` and print the plaintext.

mod aws;
mod cli;
mod config;
mod invoker;
mod telemetry;

use std::process::ExitCode;

use common::DecryptError;
use tracing::{debug, info, warn};

use cli::Command;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), DecryptError> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let (request, debug, ignored) = match cli::parse_args(std::env::args().skip(1)) {
        Command::Decrypt {
            request,
            debug,
            ignored,
        } => (request, debug, ignored),
        Command::Help => {
            print!("{}", cli::USAGE);
            return Ok(());
        }
        Command::Version => {
            println!("kms-decrypt {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    };

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    // A bad setting is reported only after the parameters have been echoed;
    // until then logging runs on the defaults.
    let (cfg, mut setup_error) = match Config::from_env() {
        Ok(cfg) => (cfg, None),
        Err(e) => (
            Config::default(),
            Some(DecryptError::Config(format!("{e:#}"))),
        ),
    };

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg.log_level, cfg.log_format, debug) {
        setup_error.get_or_insert(DecryptError::Config(e.to_string()));
    }
    if setup_error.is_some() {
        warn!("startup configuration invalid; logging with defaults");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "kms-decrypt starting");
    for token in &ignored {
        debug!(token = %token, "ignoring unrecognised argument");
    }

    // -----------------------------------------------------------------------
    // 4. Decrypt
    // -----------------------------------------------------------------------
    let kms = aws::KmsDecryptor::new(cfg.endpoint_url);
    let decryptor = match setup_error {
        None => Ok(&kms),
        Some(e) => Err(e),
    };
    let mut stdout = std::io::stdout().lock();
    invoker::run(request, decryptor, &mut stdout).await
}
