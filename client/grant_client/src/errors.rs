//! Client-wide error types.
//!
//! Nothing here is recovered inside the crate: every failure reaches the caller
//! with the remote diagnostic intact. Use [`ClientError::kind`] to decide whether
//! to re-authenticate, show the remote rejection, or treat it as a client bug.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A view call was rejected by the contract (unknown method, bad args, panic).
    #[error("Remote query error: {0}")]
    RemoteQuery(String),

    /// A change transaction failed on chain, or its fate is unknown.
    #[error("Remote execution error: {0}")]
    RemoteExecution(String),

    /// The response did not match the method's declared result shape.
    #[error("Malformed result: {0}")]
    MalformedResult(String),

    /// A change call was attempted without a signed-in identity.
    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Call options that the method kind does not accept.
    #[error("Invalid call options: {0}")]
    InvalidOptions(String),

    #[error("Invalid account id: {0:?}")]
    InvalidAccountId(String),

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Argument serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification used by callers to pick a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote rejected the call; show its message.
    Remote,
    /// No usable identity; prompt the user to sign in.
    Authorization,
    /// Network or transport failure; view calls may be retried.
    Transport,
    /// Caller or client bug.
    Client,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RemoteQuery(_) | Self::RemoteExecution(_) => ErrorKind::Remote,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::Http(_) => ErrorKind::Transport,
            Self::MalformedResult(_)
            | Self::Config(_)
            | Self::InvalidOptions(_)
            | Self::InvalidAccountId(_)
            | Self::InvalidAmount(_)
            | Self::InvalidPublicKey(_)
            | Self::Json(_) => ErrorKind::Client,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
