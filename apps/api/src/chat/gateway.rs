//! The agentic tool loop shared by chat and fit analysis: send the
//! conversation, execute whatever tools the model requests against the
//! content index, feed results back, repeat until the model stops asking.

use serde_json::json;
use tracing::{debug, warn};

use crate::index::tools::ToolCall;
use crate::index::ContentIndex;
use crate::llm_client::{ContentBlock, LlmError, Message, ModelBackend, ModelRequest, ToolSpec};

/// Chat answers rarely need more than a couple of lookups.
pub const CHAT_TOOL_ITERATIONS: usize = 5;
/// Fit analysis cross-checks many skills against the index.
pub const FIT_TOOL_ITERATIONS: usize = 10;

/// Runs the request to completion, returning the model's final text. If the
/// iteration cap is hit mid-loop, the last text seen is returned rather than
/// erroring, so a long tool chain degrades to a partial answer.
///
/// `index` may be absent when the caller offers no tools; a tool call that
/// arrives anyway gets an error result instead of data.
pub async fn run_tool_loop(
    backend: &dyn ModelBackend,
    system: String,
    mut messages: Vec<Message>,
    tools: Vec<ToolSpec>,
    index: Option<&ContentIndex>,
    max_tokens: u32,
    max_iterations: usize,
) -> Result<String, LlmError> {
    let mut last_text = String::new();

    for iteration in 0..max_iterations {
        let request = ModelRequest {
            system: system.clone(),
            messages: messages.clone(),
            tools: tools.clone(),
            max_tokens,
        };
        let response = backend.send(&request).await?;

        if let Some(text) = response.text() {
            last_text = text.to_string();
        }

        if !response.wants_tools() {
            if last_text.is_empty() {
                return Err(LlmError::EmptyContent);
            }
            return Ok(last_text);
        }

        let mut results = Vec::new();
        for (id, name, input) in response.tool_uses() {
            let output = match (ToolCall::parse(name, input), index) {
                (Ok(call), Some(index)) => {
                    debug!("Tool call {name} (iteration {iteration})");
                    call.execute(index)
                }
                (Ok(_), None) => {
                    warn!("Tool call {name} with no index loaded");
                    json!({ "error": "content index unavailable" })
                }
                (Err(e), _) => {
                    warn!("Rejected tool call {name}: {e}");
                    json!({ "error": e.to_string() })
                }
            };
            results.push(ContentBlock::ToolResult {
                tool_use_id: id.to_string(),
                content: output.to_string(),
            });
        }

        messages.push(Message::assistant_blocks(response.content));
        messages.push(Message::tool_results(results));
    }

    warn!("Tool loop hit the {max_iterations}-iteration cap, returning last text");
    if last_text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(last_text)
}
