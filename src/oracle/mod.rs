//! Password oracles
//!
//! An oracle answers one question: does this candidate open the archive?

pub mod archive;

pub use archive::ZipOracle;

use thiserror::Error;

/// Error raised by an oracle while testing a candidate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The candidate is wrong; the attack carries on
    #[error("wrong password")]
    Mismatch,

    #[error("IO error ({path}): {message}")]
    Io { path: String, message: String },

    #[error("archive is corrupt: {message}")]
    Corrupt { message: String },

    #[error("unsupported archive: {message}")]
    Unsupported { message: String },
}

impl OracleError {
    /// Create an IO error
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a corruption error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Create an unsupported-archive error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Check if this error only means the password was wrong
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch)
    }
}

/// Core trait for password oracles.
///
/// `Ok(true)` means the archive opened. `Ok(false)` and [`OracleError::Mismatch`]
/// both mean a wrong password; any other error is fatal to the attack.
pub trait DecryptionOracle {
    fn try_password(&mut self, candidate: &str) -> Result<bool, OracleError>;
}

impl<F> DecryptionOracle for F
where
    F: FnMut(&str) -> Result<bool, OracleError>,
{
    fn try_password(&mut self, candidate: &str) -> Result<bool, OracleError> {
        self(candidate)
    }
}
