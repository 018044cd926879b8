//! Error types for VRF resolution.
//!
//! The four lookup operations on [`crate::VrfMgr`] never surface these
//! errors: they collapse every failure into their sentinel result. The
//! readers underneath them, the configuration loader and the VRF inventory
//! return [`VrfMgrResult`].

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for VRF resolution operations.
pub type VrfMgrResult<T> = Result<T, VrfMgrError>;

/// Errors that can occur while resolving VRF identifiers.
#[derive(Debug, Error)]
pub enum VrfMgrError {
    /// A backing file or directory could not be opened or read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The requested VRF, table or attribute does not exist.
    #[error("Not found: {what}")]
    NotFound {
        /// Description of what was looked up.
        what: String,
    },

    /// A VRF name that cannot name a master device.
    #[error("Invalid VRF name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Memory for a mapping list could not be reserved.
    #[error("Unable to reserve room for {requested} VRF mappings")]
    CapacityExhausted {
        /// Number of entries requested.
        requested: usize,
    },

    /// Two VRFs share the same ID or name.
    #[error("Duplicate VRF: {key}")]
    DuplicateVrf {
        /// The clashing ID or name.
        key: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Invalid configuration in '{}': {message}", .path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl VrfMgrError {
    /// Creates an IO error bound to the path that failed.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Returns true if this error means "nothing there" rather than a
    /// failure to look.
    ///
    /// Callers of the sentinel API cannot tell the two apart; this is for
    /// code using the fallible readers directly.
    pub fn is_not_found(&self) -> bool {
        match self {
            VrfMgrError::NotFound { .. } => true,
            VrfMgrError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
