use clap::Parser;
use tracing::{info, warn};

use imoveis_web::config::SiteConfig;
use imoveis_web::state::AppState;
use imoveis_web::{observability, router};

#[derive(Parser)]
#[command(name = "imoveis-web")]
#[command(about = "Server-rendered listing site backed by a filesystem content store")]
#[command(version = "0.1.0")]
struct Cli {
    /// Port to bind (overrides config and PORT env)
    #[arg(long)]
    port: Option<u16>,
    /// Content directory holding properties/ (overrides config)
    #[arg(long)]
    content_dir: Option<String>,
    /// Path to the config file
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    observability::logging::init_logging();

    let mut config = SiteConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!("config file not loaded ({}), using defaults", e);
        SiteConfig::default()
    });
    if let Ok(port) = std::env::var("PORT") {
        if let Ok(port) = port.parse() {
            config.port = port;
        }
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dir) = cli.content_dir {
        config.content_dir = dir;
    }

    let state = AppState::new(config);
    let port = state.config.port;
    let app = router::app_router(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on {} (visit http://127.0.0.1:{})", bind_addr, port);
    axum::serve(listener, app).await?;
    Ok(())
}
