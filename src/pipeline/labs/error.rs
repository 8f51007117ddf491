//! Errors at the edges of the lab engine.
//!
//! Extraction itself never fails (an unreadable report yields an empty
//! result); these cover configuration, token files and enum parsing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}
