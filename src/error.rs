// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// Error taxonomy for the client data layer.
///
/// Background refresh paths catch and log these; user-initiated mutations
/// surface them to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (DNS, connect, read, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx status from the bills backend or the FX provider.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Successful transport but a body that is not JSON. Carries the status
    /// and the first 200 characters of the body for diagnostics.
    #[error("non-JSON response (status {status}): {excerpt}")]
    MalformedResponse { status: u16, excerpt: String },

    /// An operation that needs a logged-in user found none in the store.
    #[error("no logged-in user in storage")]
    AuthRequired,

    /// FX provider rejected the configured API key.
    #[error("currency API key invalid or revoked")]
    InvalidApiKey,

    /// FX provider daily/monthly quota exhausted.
    #[error("currency API quota reached")]
    QuotaReached,

    /// Any other FX provider error_type.
    #[error("currency provider error: {0}")]
    Provider(String),

    /// Backend answered 2xx but declared the operation failed.
    #[error("{0}")]
    Server(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
