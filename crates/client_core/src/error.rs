use thiserror::Error;

/// Failure of a single request to the game service. None of these are
/// retried; the round stays in whatever state it was before the call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport failure calling {route}: {source}")]
    Transport {
        route: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{route} rejected with status {status}: {message}")]
    Rejected {
        route: &'static str,
        status: u16,
        message: String,
    },
    #[error("malformed {route} response: {reason}")]
    MalformedResponse { route: &'static str, reason: String },
    #[error("invalid game service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ClientError {
    pub fn route(&self) -> Option<&'static str> {
        match self {
            ClientError::Transport { route, .. }
            | ClientError::Rejected { route, .. }
            | ClientError::MalformedResponse { route, .. } => Some(route),
            ClientError::InvalidUrl(_) | ClientError::HttpClient(_) => None,
        }
    }
}
