// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction keeping answers anchored to indexed content.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim about skills, projects, or experience must come from \
    the content index, reached through the provided tools or the supplied \
    context. Do NOT infer, interpolate, or invent details. \
    If the index does not support a claim, omit it entirely.";
