//! Tracing subscriber setup
//!
//! Logs go to stderr so table output on stdout stays clean.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `queuesnip=warn`)
//! - `QUEUESNIP_LOG_FORMAT`: `json` for structured output, anything else for compact text

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "queuesnip=warn";

pub fn init_logging() -> Result<()> {
    let log_format = std::env::var("QUEUESNIP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            // Machine-readable: one JSON object per event
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }

    Ok(())
}
