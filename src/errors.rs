//! Error types for startup and per-connection failures

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid settings detected before the listener is bound
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("return code {0} is not a valid HTTP status (expected 100..=599)")]
    InvalidStatus(u16),
    #[error("cache dir {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot inspect cache dir {}: {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        source: io::Error,
    },
}

/// Malformed request head
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request head is not valid UTF-8")]
    InvalidUtf8,
    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),
    #[error("invalid HTTP version: {0:?}")]
    InvalidVersion(String),
    #[error("invalid header line: {0:?}")]
    InvalidHeader(String),
    #[error("request head exceeds {0} bytes")]
    HeadTooLarge(usize),
    #[error("connection closed before the request head was complete")]
    Incomplete,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: io::Error,
    },
    #[error("bad request: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;
