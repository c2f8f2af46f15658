pub mod health;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat_handlers;
use crate::content::handlers as content_handlers;
use crate::errors::AppError;
use crate::state::AppState;
use crate::variant::redirect_target;

async fn not_found() -> AppError {
    AppError::NotFound("no such route".to_string())
}

/// Extracts one query parameter from a raw query string. The variant key
/// vocabulary is plain ASCII, so no percent-decoding is needed.
fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

/// Issues the permanent redirect to the canonical variant path when a `v`
/// query parameter targets the home or resume route. Everything else passes
/// through, including unknown variant keys.
async fn variant_redirect(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let target = {
        let uri = request.uri();
        let v = uri.query().and_then(|q| query_param(q, "v"));
        redirect_target(uri.path(), v, &state.variants)
    };

    match target {
        Some(target) => Redirect::permanent(&target).into_response(),
        None => next.run(request).await,
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/chat", post(chat_handlers::handle_chat))
        .route("/api/fit-finder", post(chat_handlers::handle_fit_finder))
        .route(
            "/api/content-actions",
            get(content_handlers::handle_content_actions),
        )
        // the redirect middleware must also see paths with no route of their
        // own ("/", "/resume"), hence the explicit fallback inside the layer
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            variant_redirect,
        ))
        .with_state(state)
}
