pub mod chat;
pub mod config;
pub mod content;
pub mod errors;
pub mod index;
pub mod llm_client;
pub mod routes;
pub mod state;
pub mod variant;
