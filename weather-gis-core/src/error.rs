use thiserror::Error;

use crate::provider::Endpoint;

/// Generic message shown when a failed request carries no server-provided detail.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection or data error";

/// Failure of a single call against the remote weather API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to send request to {endpoint}: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        /// The `detail` field of the error body, if the server sent one.
        detail: Option<String>,
        body: String,
    },

    #[error("Failed to parse {endpoint} JSON: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => *endpoint,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The text a user gets to see: the server's detail when present, a generic
    /// connection message otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { detail: Some(detail), .. } => detail.clone(),
            _ => CONNECTION_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Failure to turn a free-text query into a location.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Place not found: {0}")]
    NotFound(String),

    #[error("Lookup failed for '{query}': {message}")]
    LookupFailed { query: String, message: String },
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("Invalid coordinate ({latitude}, {longitude})")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}
