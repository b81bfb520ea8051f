use reqwest::StatusCode;

pub const NETWORK_ERROR: &str = "Network error occurred";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure, or a response body that could not be decoded.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server's `message` field, if any.
    #[error("request failed with {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Text shown to the user for a failed action.
    ///
    /// Network failures always read "Network error occurred"; API failures
    /// surface the server message verbatim, else `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::Network(_) => NETWORK_ERROR.to_string(),
            Self::Api { message: Some(msg), .. } if !msg.is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
