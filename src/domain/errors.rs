use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unexpected status code {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Panel database stayed locked after {0} attempts")]
    RetriesExhausted(u32),
    #[error("Unexpected panel response: {0}")]
    UnexpectedResponse(String),
    #[error("Panel rejected the operation: {0}")]
    Rejected(String),
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("No production inbounds found (marker {0:?})")]
    NoProductionInbounds(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PanelError {
    /// True for failures caused by the environment rather than the panel data:
    /// missing configuration, unreachable host, rejected credentials.
    pub fn is_environmental(&self) -> bool {
        matches!(
            self,
            PanelError::Config(_) | PanelError::Network(_) | PanelError::Auth(_)
        )
    }
}

pub type PanelResult<T> = Result<T, PanelError>;
