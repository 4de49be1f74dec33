//! Error types for the installation server.
//!
//! Per-event input problems (malformed datagrams, unmatched colors, unknown
//! launchers, cooldown) are not errors: they are dropped where they occur.
//! What remains here are the failures a caller can act on.

use thiserror::Error;

use crate::physics::BodyHandle;

/// Settings file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file has a wrong format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// A body handle was used after the body was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),
}

/// Outbound OSC link errors
#[derive(Debug, Error)]
pub enum OscError {
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("OSC encoding error: {0}")]
    Encoding(String),

    #[error("invalid OSC target address: {0}")]
    InvalidAddress(String),
}

pub type OscResult<T> = Result<T, OscError>;
