use thiserror::Error;

use crate::domain::DomainError;
use crate::domain::resource::ResourceKind;

/// Failure talking to the registry service
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Resource kind '{0}' is not exposed by the registry service")]
    NotResolvable(ResourceKind),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Network-class failures the next attempt may not see
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<FetchError> for DomainError {
    fn from(error: FetchError) -> Self {
        DomainError::remote(error.to_string())
    }
}
