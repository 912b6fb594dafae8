//! Switchboard CLI — the main entry point.
//!
//! Commands:
//! - `serve`         — Start the HTTP gateway
//! - `ask`           — Route a single message in-process
//! - `capabilities`  — Show registered handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "switchboard",
    about = "Switchboard — intent routing for specialized chat handlers",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Route a single message and print the response
    Ask {
        /// The message to route
        message: String,

        /// Reuse a session id (defaults to a fresh session)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Show the registered capabilities
    Capabilities,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Ask { message, session } => commands::ask::run(config, message, session).await?,
        Commands::Capabilities => commands::capabilities::run(config)?,
    }

    Ok(())
}
