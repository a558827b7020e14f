//! issues-proxy
//!
//! A small proxy in front of the GitHub REST API that validates issue queries
//! before forwarding them.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────┐    ┌──────────────┐    ┌────────────┐
//!     ───────────────────▶│   http   │───▶│  translator  │───▶│  upstream  │────▶ GitHub
//!                         │  server  │    │ params check │    │   client   │
//!     Client Response     └──────────┘    └──────────────┘    └────────────┘
//!     ◀─────────────────── relay body, or 400 with a mapped message
//!
//!     Cross-cutting: config, observability (logs, metrics), lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use issues_proxy::config::load_or_default;
use issues_proxy::lifecycle::startup;

#[derive(Parser)]
#[command(name = "issues-proxy", version)]
#[command(about = "Validating proxy for GitHub issue and label listings", long_about = None)]
struct Args {
    /// Path to a TOML config file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;
    startup::run(config).await?;
    Ok(())
}
