use std::convert::Infallible;

use thiserror::Error;

/// Errors returned by [`Client`](crate::Client) operations
#[derive(Error, Debug)]
pub enum Error {
    /// Login did not yield a bearer token
    #[error("Login failed: {0}")]
    Authentication(String),

    /// A locally supplied value is outside its enumerated set
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The server answered but reported a non-ok status
    #[error("Server rejected the update (status: {status})")]
    ServerRejected { status: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_rejected_mentions_status() {
        let err = Error::ServerRejected {
            status: "error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Server rejected the update (status: error)"
        );
    }

    #[test]
    fn decode_error_mentions_url() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Decode {
            url: "https://api.pocketcasts.com/user/starred".to_string(),
            source,
        };
        assert!(err.to_string().contains("/user/starred"));
    }
}
