// src/error.rs
//! Error types for the GPS clock

use std::fmt;

pub type Result<T> = std::result::Result<T, ClockError>;

#[derive(Debug)]
pub enum ClockError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Connection(String),
    Other(String),
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::Io(e) => write!(f, "IO error: {}", e),
            ClockError::Serial(e) => write!(f, "Serial error: {}", e),
            ClockError::Json(e) => write!(f, "JSON error: {}", e),
            ClockError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ClockError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for ClockError {}

impl From<std::io::Error> for ClockError {
    fn from(error: std::io::Error) -> Self {
        ClockError::Io(error)
    }
}

impl From<tokio_serial::Error> for ClockError {
    fn from(error: tokio_serial::Error) -> Self {
        ClockError::Serial(error)
    }
}

impl From<serde_json::Error> for ClockError {
    fn from(error: serde_json::Error) -> Self {
        ClockError::Json(error)
    }
}

impl From<anyhow::Error> for ClockError {
    fn from(error: anyhow::Error) -> Self {
        ClockError::Other(error.to_string())
    }
}
