//! The chat / fit-analysis gateway: guardrails, prompt construction, the
//! model tool loop, and the HTTP handlers that tie them together.

pub mod fit;
pub mod gateway;
pub mod guardrails;
pub mod handlers;
pub mod prompts;
