/// Errors raised while talking to the remote search API.
///
/// Only retrieval surfaces these to callers. Relevance evaluation and the
/// feedback log absorb their failures and fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A search operation failed; the message names the operation and the cause.
    #[error("{0}")]
    SearchFailure(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_api_error() {
        let err = SearchError::Api {
            status: 401,
            message: "invalid api key".into(),
        };
        assert_eq!(err.to_string(), "API error (401): invalid api key");
    }

    #[test]
    fn display_search_failure_is_the_bare_message() {
        let err = SearchError::SearchFailure("Search failed: HTTP error: refused".into());
        assert_eq!(err.to_string(), "Search failed: HTTP error: refused");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
