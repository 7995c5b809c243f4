//! Errors raised before the clearing engine starts computing.
//!
//! Malformed documents, structural validation failures and bad configuration
//! all surface as [`GridError`]. The clearing crate wraps it in its own enum.
//!
//! ```no_run
//! use gridclear_core::io::load_network;
//! use gridclear_core::GridResult;
//! use std::path::Path;
//!
//! fn prepare(path: &Path) -> GridResult<()> {
//!     let (network, bids) = load_network(path)?;
//!     network.validate_with_bids(&bids)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML, JSON or CSV input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Every structural error found, joined with "; "
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown {kind} '{id}'")]
    UnknownElement { kind: &'static str, id: String },
}

pub type GridResult<T> = Result<T, GridError>;

macro_rules! parse_error_from {
    ($($source:ty),+) => {
        $(
            impl From<$source> for GridError {
                fn from(err: $source) -> Self {
                    GridError::Parse(err.to_string())
                }
            }
        )+
    };
}

parse_error_from!(serde_json::Error, toml::de::Error, toml::ser::Error);
