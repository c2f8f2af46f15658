use std::sync::Arc;

use crate::config::Config;
use crate::index::cache::IndexCache;
use crate::llm_client::ModelBackend;
use crate::variant::Variant;

/// Shared application state for all request handlers.
///
/// `llm` is absent when no API credential is configured; the chat and fit
/// endpoints surface that as a 503 rather than failing at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Option<Arc<dyn ModelBackend>>,
    pub index_cache: Arc<IndexCache>,
    pub variants: Arc<Vec<Variant>>,
}
