//! Inkpilot - AI-assisted novel-writing engine
//!
//! The client-side core of an AI novel-writing tool:
//! - Normalize chat-completion payloads from any provider into plain text
//! - Transparently observe auto-pilot traffic without altering it
//! - Drive writing-assistant operations (generate, humanize, analyze, detect)

pub mod assistant;
pub mod config;
pub mod extract;
pub mod interceptor;
pub mod transport;
pub mod wire;

pub use assistant::{Assistant, DetectionReport};
pub use config::InkpilotConfig;
pub use extract::{extract, Envelope};
pub use interceptor::Interceptor;
pub use transport::{HttpTransport, OutboundRequest, RawResponse, Transport};

/// Result type for Inkpilot operations
pub type Result<T> = std::result::Result<T, InkpilotError>;

/// Errors that can occur in Inkpilot
#[derive(Debug, thiserror::Error)]
pub enum InkpilotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
