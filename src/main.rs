use std::sync::Arc;

use kamiscroll::config::AppConfig;
use kamiscroll::routes;
use kamiscroll::services::image::ImageClient;
use kamiscroll::services::llm::LLMClient;
use kamiscroll::state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kamiscroll=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    if config.llm.api_key.is_none() {
        tracing::warn!("LLM_API_KEY is not set; story requests are sent unauthenticated");
    }
    if config.image.api_key.is_none() {
        tracing::warn!("IMAGE_API_KEY is not set; image requests are sent unauthenticated");
    }

    let llm_client = Arc::new(LLMClient::new(&config.llm));
    let image_client = Arc::new(ImageClient::new(&config.image));

    let app_state = AppState::new(
        llm_client,
        image_client,
        config.story_timeout,
        config.image_timeout,
    );
    let app = routes::router(app_state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
