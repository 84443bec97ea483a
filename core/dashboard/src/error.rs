//! FILENAME: core/dashboard/src/error.rs

use engine::{ConfigError, SchemaError};
use thiserror::Error;

/// Failure of a load or refresh round trip.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timeout - server is taking too long to respond ({seconds} seconds elapsed)")]
    Timeout { seconds: u64 },

    /// Non-2xx response. `message` is the server's body text when it sent one.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Received non-JSON response from server")]
    NonJson,

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport failure reported by the HTTP collaborator.
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// Credentials were rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid credentials")]
pub struct AuthFailure;

/// A session could not be assembled from its parts.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
