//! zmem MCP server over stdio

use clap::Parser;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use std::path::PathBuf;
use std::process;
use zmem_core::ZConfig;
use zmem_telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser, Debug)]
#[command(author, version, about = "Semantic memory for agents, served over MCP", long_about = None)]
struct Cli {
    /// Path to config.toml (searched for upward from the working directory otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the vector store
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let loaded = ZConfig::load_from(cli.config.as_deref());

    let mut telemetry = TelemetryConfig::new().with_json(cli.log_json);
    if let Ok(config) = &loaded {
        telemetry.json |= config.observability.json;
        telemetry.filter = config.observability.log_filter.clone();
    }
    if let Err(e) = init_telemetry(&telemetry) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            process::exit(1);
        }
    };

    let server = match zmem_mcp::build_server(&config, cli.data_dir.as_deref()).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start memory server");
            process::exit(1);
        }
    };

    tracing::info!("Serving memory tools over stdio");
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    tracing::info!("Client disconnected, shutting down");

    Ok(())
}
