use std::fmt;

/// Errors a chain-side collaborator may return.
#[derive(Debug)]
pub enum ChainError {
    /// Network or transport failure (unreachable node, timeout).
    Transport(String),
    /// The node or signer answered with a non-success status.
    Api {
        status: Option<u16>,
        message: String,
    },
    /// A response payload could not be decoded.
    Decode(String),
    /// A required client setting is missing or invalid.
    Config(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Transport(msg) => write!(f, "transport error: {msg}"),
            ChainError::Api {
                status: Some(code),
                message,
            } => write!(f, "chain api error status={code}: {message}"),
            ChainError::Api {
                status: None,
                message,
            } => write!(f, "chain api error: {message}"),
            ChainError::Decode(msg) => write!(f, "decode error: {msg}"),
            ChainError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<reqwest::Error> for ChainError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ChainError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ChainError::Api {
                status: Some(status.as_u16()),
                message: e.to_string(),
            }
        } else {
            ChainError::Transport(e.to_string())
        }
    }
}
