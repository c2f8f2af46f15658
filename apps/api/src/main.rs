use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio_api::config::Config;
use folio_api::index::cache::IndexCache;
use folio_api::llm_client::{self, LlmClient, ModelBackend};
use folio_api::routes::build_router;
use folio_api::state::AppState;
use folio_api::variant::discover_variants;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Discover content variants once; the list is immutable at runtime
    let variants = discover_variants(&config.content_dir);
    info!(
        "Discovered {} variants: {}",
        variants.len(),
        variants
            .iter()
            .map(|v| v.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Index read cache; the snapshot itself is produced by the build-index binary
    let index_cache = Arc::new(IndexCache::new(config.static_dir.clone()));

    // LLM client, absent without a credential (chat/fit answer 503)
    let llm: Option<Arc<dyn ModelBackend>> = match &config.anthropic_api_key {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmClient::new(key.clone())))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; chat and fit-finder will answer 503");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        llm,
        index_cache,
        variants: Arc::new(variants),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
