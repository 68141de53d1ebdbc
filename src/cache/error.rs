use thiserror::Error;

/// Failures while building or talking to the remote cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache url is not configured")]
    MissingUrl,
    #[error("cache token is not configured")]
    MissingToken,
    #[error("invalid cache url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported cache url scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("cache token is not a valid header value")]
    InvalidToken,
    #[error("failed to build cache http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("cache request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cache service rejected `{command}` (status {status}): {message}")]
    Remote {
        command: &'static str,
        status: u16,
        message: String,
    },
    #[error("unexpected reply to `{command}`: {reply}")]
    UnexpectedReply {
        command: &'static str,
        reply: String,
    },
    #[error("cache payload could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),
}

impl CacheError {
    pub(crate) fn unexpected(command: &'static str, reply: &serde_json::Value) -> Self {
        Self::UnexpectedReply {
            command,
            reply: reply.to_string(),
        }
    }
}
