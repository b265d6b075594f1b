mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "instalytics")]
#[command(about = "Instagram influencer analytics from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch analytics for a username through the proxy
    Analyze {
        username: String,
        /// Print the aggregate as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Proxy base URL (defaults to `VITE_PROXY_URL`)
        #[arg(long)]
        proxy_url: Option<String>,
    },
    /// Search the suggestion table
    Search { query: String },
    /// Print synthetic analytics for a username as JSON
    Mock { username: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = instalytics_core::load_app_config()?;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            username,
            json,
            proxy_url,
        } => {
            let proxy_url = proxy_url.unwrap_or_else(|| config.proxy_url.clone());
            report::run_analyze(&proxy_url, &username, json).await?;
        }
        Commands::Search { query } => report::run_search(&config, &query)?,
        Commands::Mock { username } => report::run_mock(&username)?,
    }

    Ok(())
}
