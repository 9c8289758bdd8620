//! Error handling for PalletKit
//!
//! Provides the error types shared by every layer of the planner:
//! - Configuration errors (malformed jobs, empty strokes)
//! - Wrapped I/O and JSON errors for the crates that read jobs from disk
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Raised when a saved pallet configuration or a motion program breaks an
/// invariant the planner relies on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A transfer references a pallet that does not exist
    #[error("Transfer {transfer_index} references pallet {pallet_index}, but only {pallet_count} pallet(s) are configured")]
    UnknownPallet {
        /// Position of the offending transfer in the job.
        transfer_index: usize,
        /// The pallet index it references.
        pallet_index: usize,
        /// Number of configured pallets.
        pallet_count: usize,
    },

    /// A box path was built without any waypoint
    #[error("Box path must contain at least one waypoint")]
    EmptyPath,
}

/// Main error type for PalletKit
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Result type for PalletKit operations
pub type Result<T> = std::result::Result<T, Error>;
