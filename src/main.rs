use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tracing::debug;

use roundtable::app::{handle_fatal_error, initialize_app, init_logging, AppConfig};

/// Multi-round interview orchestration service
#[derive(Parser)]
#[command(name = "roundtable")]
#[command(about = "Roundtable - deterministic AI-assisted interviews", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interview HTTP API (default command)
    Serve {
        /// Listen address, overriding ROUNDTABLE_BIND and PORT
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Load and print the effective configuration, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match cli.command {
        Some(Commands::Serve { bind }) => run_serve(verbose, bind).await,
        Some(Commands::CheckConfig) => run_check_config(verbose),
        None => run_serve(verbose, None).await,
    };

    if let Err(e) = result {
        handle_fatal_error(e, verbose);
    }
}

async fn run_serve(verbose: u8, bind: Option<SocketAddr>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env(verbose)?;
    if let Some(bind) = bind {
        config = config.with_bind(bind);
    }

    let orchestrator = initialize_app(&config).await?;
    debug!(bind = %config.bind, "Starting server");
    roundtable::server::serve(orchestrator, config.bind).await
}

fn run_check_config(verbose: u8) -> anyhow::Result<()> {
    let config = AppConfig::from_env(verbose)?;
    init_logging(&config);
    println!("bind:            {}", config.bind);
    println!("storage:         {:?}", config.storage.backend);
    println!("live state:      {:?}", config.storage.live_state);
    println!("live state ttl:  {:?}", config.storage.live_state_ttl);
    println!("ai model:        {}", config.ai.model);
    println!(
        "ai provider:     {}",
        if config.ai.api_key.is_some() { config.ai.base_url.as_str() } else { "mock" }
    );
    Ok(())
}
