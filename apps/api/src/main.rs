mod config;
mod errors;
mod export;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::default_page_config;
use crate::resume::persistence::{
    load_store, InMemoryRepository, JsonFileRepository, ResumeRepository,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    let repository: Arc<dyn ResumeRepository> = if config.persist {
        info!("Persisting resume to {}", config.data_path.display());
        Arc::new(JsonFileRepository::new(config.data_path.clone()))
    } else {
        info!("Persistence disabled, resume is kept in memory");
        Arc::new(InMemoryRepository::default())
    };
    let store = load_store(repository.as_ref()).await?;

    let page_config = default_page_config();
    info!(
        "Export page: {}x{}pt, margin {:.1}pt",
        page_config.page_width_pt, page_config.page_height_pt, page_config.margin_pt
    );

    let state = AppState::new(store, repository, config.clone(), page_config);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
