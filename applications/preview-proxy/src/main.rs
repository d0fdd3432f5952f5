/// VibeCheck preview proxy - preview clip lookup service
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibe_preview_proxy::{
    create_router, AppState, EmbedPreviewFinder, PreviewFinder, ProxyConfig,
};

#[derive(Parser)]
#[command(name = "vibe-preview-proxy")]
#[command(about = "VibeCheck song preview lookup proxy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "VIBE_PROXY_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Look up previews for one track and print the result
    Lookup {
        /// Catalog track id
        track_id: String,
        /// Configuration file path
        #[arg(short, long, env = "VIBE_PROXY_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibe_preview_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Lookup { track_id, config } => {
            lookup(&track_id, config).await?;
        }
    }

    Ok(())
}

fn build_finder(config: &ProxyConfig) -> anyhow::Result<Arc<dyn PreviewFinder>> {
    let finder = EmbedPreviewFinder::new(&config.finder.page_base_url, config.timeout())?;
    Ok(Arc::new(finder))
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ProxyConfig::load(config_path.as_deref())?;

    tracing::info!("Starting VibeCheck preview proxy");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Page base URL: {}", config.finder.page_base_url);

    let state = AppState::new(build_finder(&config)?);
    let app = create_router(state);

    let addr = config.bind_addr()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn lookup(track_id: &str, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ProxyConfig::load(config_path.as_deref())?;
    let finder = build_finder(&config)?;

    let results = finder.find(track_id).await?;
    if results.iter().all(|r| r.preview_urls.is_empty()) {
        println!("No preview found for track {}", track_id);
        return Ok(());
    }

    for result in results {
        println!("{} ({})", result.name, result.spotify_url);
        for url in result.preview_urls {
            println!("  {}", url);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
