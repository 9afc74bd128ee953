//! Error types for capscope
//!
//! Only snapshot loading and configuration can fail. Resolution itself
//! answers `false` instead of erroring.

use thiserror::Error;

/// The main error type for capscope operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    #[error("duplicate {scope} resource id: {id}")]
    DuplicateResource { scope: &'static str, id: String },

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for capscope operations
pub type Result<T> = std::result::Result<T, Error>;
