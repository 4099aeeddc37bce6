use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading/validation error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Completion stream transport error.
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// Internal protocol type error.
    #[error("Proto error: {0}")]
    Proto(#[from] ProtoError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem read error.
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(String),
}

/// Completion stream errors
#[derive(Debug, Error)]
pub enum StreamError {
    /// Request could not be built before the connection was opened.
    #[error("Request build failed: {0}")]
    Request(String),

    /// Network/connection-level failure.
    #[error("Connection error: {0}")]
    Connect(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {preview}")]
    Http { status: u16, preview: String },

    /// Mid-stream byte transfer failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Event payload could not be decoded.
    #[error("Invalid event payload: {0}")]
    Payload(String),
}

/// Internal proto errors
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Invalid role string value.
    #[error("Invalid role: {0}")]
    InvalidRole(String),
}
