//! FlowCMS REST API server binary.
//!
//! ## Purpose
//! Runs the content server: resolves configuration from the environment once
//! at startup, opens the Entity Store over the content root, and serves the
//! REST API (with OpenAPI/Swagger UI) until the process exits.
//!
//! ## Environment Variables
//! - `FLOWCMS_REST_ADDR`: server address (default: "0.0.0.0:3333")
//! - `CONTENT_DATA_ROOT`: directory holding `flows/` and `nuggets/` (required)

use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{build_router, AppState};
use flowcms_core::{ContentStore, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("FLOWCMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3333".into());

    let content_root = std::env::var("CONTENT_DATA_ROOT")
        .map_err(|_| anyhow::anyhow!("CONTENT_DATA_ROOT must be set to the content directory"))?;
    let content_root_path = Path::new(&content_root);
    if !content_root_path.exists() {
        anyhow::bail!(
            "Content data directory does not exist: {}",
            content_root_path.display()
        );
    }

    tracing::info!("-- Starting FlowCMS REST API on {}", addr);
    tracing::info!("managing content in {}", content_root_path.display());

    let config = Arc::new(StoreConfig::new(content_root_path.to_path_buf())?);
    let store = ContentStore::open(config).await?;
    let app = build_router(AppState { store });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
