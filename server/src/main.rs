//! UMApp Server binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use umapp_server::config::Config;
use umapp_server::{create_app, seed, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "umapp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting UMApp Server on {}:{}", config.host, config.port);

    let users = match &config.seed_file {
        Some(path) => {
            tracing::info!("Loading users from {}", path.display());
            seed::load_users(path)?
        }
        None => seed::default_users(),
    };
    tracing::info!("Serving {} users", users.len());

    let app = create_app(AppState::new(users));

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
