//! Error types for the Litmus SDK.

/// Result type for SDK operations.
pub type LitmusResult<T> = Result<T, LitmusError>;

/// Error types that can occur when talking to the Chaos Center.
#[derive(Debug, thiserror::Error)]
pub enum LitmusError {
    /// HTTP request failed (connection refused, timeout, unreadable body).
    #[error("failed to execute request: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status and no GraphQL envelope.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The GraphQL envelope carried one or more errors.
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// The GraphQL envelope carried neither data nor errors.
    #[error("GraphQL response contained no data")]
    MissingData,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl LitmusError {
    /// Check if this error is a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Collapse a list of GraphQL error messages into a single error.
    ///
    /// Messages are kept in the order the server listed them.
    pub fn from_graphql_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = messages
            .into_iter()
            .map(|m| m.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::GraphQl(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_messages_joined_in_order() {
        let err = LitmusError::from_graphql_messages(["first", "second", "third"]);
        match &err {
            LitmusError::GraphQl(msg) => assert_eq!(msg, "first, second, third"),
            other => panic!("Expected GraphQl error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "GraphQL errors: first, second, third");
    }

    #[test]
    fn test_api_error_display() {
        let err = LitmusError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 502): bad gateway");
        assert!(!err.is_timeout());
    }
}
