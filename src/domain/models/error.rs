#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use serde::Deserialize;

pub const GENERIC_AUTH_FAILURE: &str = "An error occurred. Please try again.";

/// Errors surfaced by the session manager and the backend client. Anything
/// else the binary can fail on travels as `anyhow::Error`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Bad credentials, or the login endpoint failed.
    #[error("{0}")]
    Authentication(String),

    /// User creation was rejected, e.g. the username is taken.
    #[error("{0}")]
    Registration(String),

    /// The backend answered 401. The session is no longer usable.
    #[error("Your session has expired. Please log in again.")]
    AuthorizationExpired,

    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
    },
}

impl ClientError {
    pub fn request(status: Option<u16>, message: &str) -> ClientError {
        return ClientError::Request {
            status,
            message: message.to_string(),
        };
    }

    pub fn status(&self) -> Option<u16> {
        return match self {
            ClientError::AuthorizationExpired => Some(401),
            ClientError::Request { status, .. } => *status,
            _ => None,
        };
    }

    /// Re-labels a transport level failure from an auth endpoint. The
    /// backend's detail is kept for error statuses, otherwise the generic
    /// login form message is used.
    pub fn into_authentication(self) -> ClientError {
        return ClientError::Authentication(self.auth_message());
    }

    pub fn into_registration(self) -> ClientError {
        return ClientError::Registration(self.auth_message());
    }

    fn auth_message(&self) -> String {
        return match self {
            ClientError::Request {
                status: Some(status),
                message,
            } if *status >= 400 && !message.is_empty() => message.to_string(),
            ClientError::Authentication(message) | ClientError::Registration(message) => {
                message.to_string()
            }
            _ => GENERIC_AUTH_FAILURE.to_string(),
        };
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Pulls the `detail` string out of an error body. Validation errors carry
/// a list in `detail`; those are not worth showing and yield `None`.
pub fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    return match parsed.detail {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => Some(detail),
        _ => None,
    };
}
