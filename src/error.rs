//! Error types for remotecc
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RemoteccError
pub type Result<T> = std::result::Result<T, RemoteccError>;

/// Unified error type for remotecc operations
#[derive(Debug, Error)]
pub enum RemoteccError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("short write: expected {expected} bytes, wrote {written}")]
    ShortWrite { expected: usize, written: usize },

    #[error("short read: expected {expected} bytes, got {read}")]
    ShortRead { expected: usize, read: usize },

    // -------------------------------------------------------------------------
    // Token Errors
    // -------------------------------------------------------------------------
    #[error("wrong token: expected {expected}, got {actual}")]
    NameMismatch { expected: String, actual: String },

    #[error("malformed token value: {0:?}")]
    MalformedValue(String),

    #[error("invalid token name: {0:?} (must be at most 4 ASCII bytes)")]
    InvalidTokenName(String),

    // -------------------------------------------------------------------------
    // Blob Errors
    // -------------------------------------------------------------------------
    #[error("{token} payload truncated: expected {expected} bytes, received {received}")]
    Truncated {
        token: String,
        expected: u64,
        received: u64,
    },

    #[error("failed to write {token} payload to sink: {source}")]
    Sink {
        token: String,
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("unsupported protocol version: {theirs} (ours is {ours})")]
    VersionMismatch { ours: u32, theirs: u32 },

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    // -------------------------------------------------------------------------
    // Compiler Wrapper Errors
    // -------------------------------------------------------------------------
    #[error("no compiler wrapper matches {0:?}")]
    UnsupportedCompiler(String),

    #[error("unsupported compilation mode: {0}")]
    UnsupportedCommand(String),
}
