//! `mem0`: command-line front end for the Mem0 platform API.
//!
//! Configuration comes from `MEM0_*` variables (a `.env` file is loaded first) and the
//! `--api-key` / `--host` flags. Results are printed to stdout as JSON. Logs go to stderr.

mod commands;

use clap::Parser;
use commands::Args;
use mem0_client::MemoryClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let client = MemoryClient::new(args.client_options()?).await?;
    commands::run(&client, args.command).await
}
