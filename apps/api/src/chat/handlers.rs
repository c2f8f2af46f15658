//! HTTP handlers for the chat and fit-analysis endpoints.
//!
//! Flow for both: validate the required text field, screen it through the
//! guardrails, then hand the conversation to the tool loop. Fit analysis
//! additionally requires the content index and a parseable JSON answer.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chat::fit::{parse_fit_analysis, FitAnalysis};
use crate::chat::gateway::{run_tool_loop, CHAT_TOOL_ITERATIONS, FIT_TOOL_ITERATIONS};
use crate::chat::guardrails::{check_guardrails, refusal_message};
use crate::chat::prompts::{
    chat_system_prompt, fit_system_prompt, fit_user_prompt, CHAT_FALLBACK_SYSTEM,
};
use crate::errors::AppError;
use crate::index::tools::tool_specs;
use crate::llm_client::{Message, ModelBackend, CHAT_MAX_TOKENS, FIT_MAX_TOKENS};
use crate::state::AppState;
use crate::variant::DEFAULT_VARIANT;

#[derive(Debug, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

/// Required fields arrive as Options so absence maps to a 400 instead of
/// axum's extractor-level 422.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
    pub variant: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub blocked: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitRequest {
    pub job_description: Option<String>,
    pub variant: Option<String>,
}

/// Fit responses are either the analysis or a guardrail refusal; the
/// refusal reuses the chat shape so clients handle both uniformly.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FitResponse {
    Analysis { analysis: FitAnalysis },
    Blocked { response: String, blocked: bool },
}

fn require_text(field: Option<String>, name: &str) -> Result<String, AppError> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn require_backend(state: &AppState) -> Result<&dyn ModelBackend, AppError> {
    state
        .llm
        .as_deref()
        .ok_or_else(|| AppError::NotConfigured("no model API credential configured".to_string()))
}

/// Rebuilds the conversation from the client-supplied history plus the new
/// message. Unknown roles are dropped rather than forwarded upstream.
fn build_messages(history: &[HistoryMessage], message: &str) -> Vec<Message> {
    let mut messages: Vec<Message> = history
        .iter()
        .filter_map(|m| match m.role.as_str() {
            "user" => Some(Message::user(&m.content)),
            "assistant" => Some(Message::assistant(&m.content)),
            other => {
                warn!("Dropping history message with role {other:?}");
                None
            }
        })
        .collect();
    messages.push(Message::user(message));
    messages
}

pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = require_text(request.message, "message")?;

    if let Some(reason) = check_guardrails(&message) {
        info!("Chat message blocked: {}", reason.as_str());
        return Ok(Json(ChatResponse {
            response: refusal_message(reason).to_string(),
            blocked: true,
        }));
    }

    let backend = require_backend(&state)?;

    // Chat degrades to an untooled conversation when the index is missing;
    // only fit analysis treats that as fatal.
    let index = match state.index_cache.get().await {
        Ok(index) => Some(index),
        Err(e) => {
            warn!("Serving chat without content index: {e:#}");
            None
        }
    };

    let (system, tools) = match &index {
        Some(index) => (
            chat_system_prompt(&index.resume, &state.config.site_url),
            tool_specs(),
        ),
        None => (CHAT_FALLBACK_SYSTEM.to_string(), Vec::new()),
    };

    let messages = build_messages(&request.history, &message);
    let response = run_tool_loop(
        backend,
        system,
        messages,
        tools,
        index.as_deref(),
        CHAT_MAX_TOKENS,
        CHAT_TOOL_ITERATIONS,
    )
    .await
    .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(ChatResponse {
        response,
        blocked: false,
    }))
}

pub async fn handle_fit_finder(
    State(state): State<AppState>,
    Json(request): Json<FitRequest>,
) -> Result<Json<FitResponse>, AppError> {
    let job_description = require_text(request.job_description, "jobDescription")?;

    if let Some(reason) = check_guardrails(&job_description) {
        info!("Fit request blocked: {}", reason.as_str());
        return Ok(Json(FitResponse::Blocked {
            response: refusal_message(reason).to_string(),
            blocked: true,
        }));
    }

    let backend = require_backend(&state)?;

    let index = state
        .index_cache
        .get()
        .await
        .map_err(|e| AppError::IndexUnavailable(format!("{e:#}")))?;

    let variant_keys: Vec<String> = state
        .variants
        .iter()
        .filter(|v| v.key != DEFAULT_VARIANT)
        .map(|v| v.key.clone())
        .collect();

    let mut prompt = fit_user_prompt(&index.resume, &job_description, &variant_keys);
    if let Some(variant) = request
        .variant
        .filter(|v| variant_keys.iter().any(|k| k == v))
    {
        prompt.push_str(&format!(
            "\n\nThe requester is currently viewing the \"{variant}\" resume variant."
        ));
    }

    let raw = run_tool_loop(
        backend,
        fit_system_prompt(),
        vec![Message::user(prompt)],
        tool_specs(),
        Some(index.as_ref()),
        FIT_MAX_TOKENS,
        FIT_TOOL_ITERATIONS,
    )
    .await
    .map_err(|e| AppError::Llm(e.to_string()))?;

    let analysis =
        parse_fit_analysis(&raw).map_err(|e| AppError::ModelOutput(e.to_string()))?;

    info!(
        "Fit analysis complete: score={} level={:?}",
        analysis.fit_score, analysis.fit_level
    );
    Ok(Json(FitResponse::Analysis { analysis }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_missing_and_blank() {
        assert!(require_text(None, "message").is_err());
        assert!(require_text(Some("   ".to_string()), "message").is_err());
        assert_eq!(
            require_text(Some(" hi ".to_string()), "message").unwrap(),
            "hi"
        );
    }

    #[test]
    fn test_build_messages_keeps_known_roles_in_order() {
        let history = vec![
            HistoryMessage {
                role: "user".to_string(),
                content: "first".to_string(),
            },
            HistoryMessage {
                role: "assistant".to_string(),
                content: "reply".to_string(),
            },
            HistoryMessage {
                role: "system".to_string(),
                content: "sneaky".to_string(),
            },
        ];
        let messages = build_messages(&history, "latest");
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].role, "user");
    }

    #[test]
    fn test_blocked_flag_omitted_when_false() {
        let wire = serde_json::to_value(ChatResponse {
            response: "hi".to_string(),
            blocked: false,
        })
        .unwrap();
        assert!(wire.get("blocked").is_none());

        let wire = serde_json::to_value(ChatResponse {
            response: "no".to_string(),
            blocked: true,
        })
        .unwrap();
        assert_eq!(wire["blocked"], true);
    }

    #[test]
    fn test_fit_request_uses_camel_case_field() {
        let request: FitRequest =
            serde_json::from_str(r#"{"jobDescription": "Platform lead"}"#).unwrap();
        assert_eq!(request.job_description.as_deref(), Some("Platform lead"));
    }
}
