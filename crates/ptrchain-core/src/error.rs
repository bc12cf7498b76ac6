use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Memory oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Failed to parse value {raw:?} at address {address:#x}: {source}")]
    Parse {
        address: u64,
        raw: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Range lookup failed for base {base:#x}: {message}")]
    LookupFailed { base: u64, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
