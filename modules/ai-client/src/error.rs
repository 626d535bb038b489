use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),
}

impl AiError {
    /// Whether a second attempt at the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AiError::Network(_) => true,
            AiError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        AiError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        assert!(AiError::Api { status: 429, body: String::new() }.is_transient());
        assert!(AiError::Api { status: 503, body: String::new() }.is_transient());
        assert!(AiError::Network("reset".into()).is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        assert!(!AiError::Api { status: 401, body: "bad key".into() }.is_transient());
        assert!(!AiError::Parse("eof".into()).is_transient());
        assert!(!AiError::Config("missing".into()).is_transient());
    }
}
