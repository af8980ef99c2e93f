//! Error Types

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Assistant error types
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Completion backend returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Completion backend unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Trading data store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AssistantError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AssistantError::ProviderUnavailable(_) | AssistantError::Io(_)
        )
    }

    /// Convert to a user-friendly message. Users never see raw errors;
    /// this is what the router sends when a backend call fails.
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Provider(_) | AssistantError::ProviderUnavailable(_) => {
                "I'm having trouble thinking right now. 😅 Please try again in a moment!".into()
            }
            AssistantError::Store(_) => {
                "I couldn't reach your trading data just now. Please try again shortly!".into()
            }
            AssistantError::Config(_) => {
                "Something's off with my setup. Please let the administrator know!".into()
            }
            _ => "Sorry, something unexpected went wrong. Please try again!".into(),
        }
    }
}

impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        AssistantError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(AssistantError::ProviderUnavailable("down".into()).is_retryable());
        assert!(!AssistantError::Config("bad".into()).is_retryable());
    }

    #[test]
    fn test_user_message_never_leaks_detail() {
        let err = AssistantError::Provider("upstream 500: secret-internal-url".into());
        assert!(!err.user_message().contains("secret"));
    }
}
