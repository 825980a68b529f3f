use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Rejected by server (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Error body shape: `{"msg": "..."}`, some endpoints use `message` instead
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(alias = "message")]
    msg: Option<String>,
}

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl AuthError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.msg)
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty());

        AuthError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Human-readable message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AuthError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Message to show the user: the server's own message, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}
