//! Process setup and client lifecycle
//!
//! - Error reporting (color-eyre) and tracing
//! - Configuration from the environment plus command-line overrides
//! - Ctrl-C cancels the in-flight operation
//! - The connection is closed on every exit path

use clap::Parser;
use core_config::LogFormat;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::{Result, WrapErr};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::commands;

/// Parse arguments and run one command
///
/// # Errors
///
/// Returns an error if:
/// - configuration is invalid (bad `QDRANT_*` value, malformed address)
/// - the engine call fails, is cancelled, or exceeds `--timeout-secs`
/// - writing output fails
pub async fn run() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();

    let log_format = match cli.log_format {
        Some(format) => format,
        None => LogFormat::from_env()?,
    };
    init_tracing(log_format, "info");

    let config = cli
        .qdrant_config()
        .wrap_err("Failed to load Qdrant configuration")?;
    debug!(url = %config.url, "Connecting to vector engine");

    let (client, handle) =
        domain_vector::connect(config).wrap_err("Failed to create vector store client")?;

    let ctx = cli.request_context();
    let token = ctx.token().clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            token.cancel();
        }
    });

    let mut stdout = std::io::stdout().lock();
    let result = commands::execute(&client, &ctx, cli.command, &mut stdout).await;

    interrupt.abort();
    handle.close();

    result
}
