use abtest_core::ConfigLoader;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "abtest")]
#[command(about = "A/B-test analytics engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the analytics HTTP API
    Serve {
        /// Server address, overrides `[server]` in the config file
        #[arg(long)]
        addr: Option<String>,
        /// Config file path
        #[arg(long, default_value = "config/Config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr, config } => run_serve(addr, &config).await?,
    }

    Ok(())
}

async fn run_serve(addr: Option<String>, config_path: &str) -> anyhow::Result<()> {
    let config = ConfigLoader::load_from_path(config_path)?;

    let addr = addr.unwrap_or_else(|| format!("{}:{}", config.server.host, config.server.port));

    tracing::info!(%addr, config = config_path, "starting A/B-test analytics API");

    let server = abtest_api::ApiServer::new(config.bootstrap);
    server.serve(&addr).await?;

    Ok(())
}
