use taleweaver::{middleware::cors_layer, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taleweaver=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Story Generator API (taleweaver)");

    // Load configuration
    let config = Config::load()?;

    tracing::info!(
        "Loaded configuration - Server: {}:{}, text: {:?}, image: {:?}",
        config.server.host,
        config.server.port,
        config.provider.text_backend,
        config.provider.image_backend
    );

    // Initialize application state
    let state = AppState::new(&config)?;

    tracing::info!(
        "Initialized application state, image policy: {:?}",
        state.story_service.image_policy()
    );

    // Create router
    let app = taleweaver::create_router(state).layer(cors_layer(&config.cors)?);

    // Create server address
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
