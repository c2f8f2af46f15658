//! Axum route handlers for content metadata.

use axum::{extract::State, Json};

use crate::content::loader::{load_content_actions, QuickAction};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/content-actions
///
/// Returns the searchable quick actions derived from blog and project files.
pub async fn handle_content_actions(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuickAction>>, AppError> {
    let content_dir = state.config.content_dir.clone();
    let actions = tokio::task::spawn_blocking(move || load_content_actions(&content_dir))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(actions))
}
