//! Error type shared by every request and local check the client performs.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// A local check failed before anything was sent
    #[error("{0}")]
    Validation(String),
    #[error("no session key stored")]
    NoSession,
    /// The backend answered with a non-success status
    #[error("backend rejected the request ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("session storage unavailable: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Text to show the user: the server's own words when it gave any, the
    /// local validation message, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(message) => message.clone(),
            ClientError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::NoSession => "No session key found. Please log in.".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 401 | 403, .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_text_is_shown_verbatim() {
        let err = ClientError::Rejected {
            status: 400,
            message: Some("Insufficient balance".to_string()),
        };
        assert_eq!(err.user_message("Transfer failed."), "Insufficient balance");
    }

    #[test]
    fn test_fallback_when_server_is_silent() {
        let err = ClientError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Transfer failed."), "Transfer failed.");
        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(err.user_message("Login failed."), "Login failed.");
    }

    #[test]
    fn test_unauthorized_statuses() {
        assert!(
            ClientError::Rejected {
                status: 401,
                message: None
            }
            .is_unauthorized()
        );
        assert!(!ClientError::NoSession.is_unauthorized());
    }
}
