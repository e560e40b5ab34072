//! Error handling for archive-forge

use thiserror::Error;

use crate::oracle::OracleError;

/// Main error type for archive-forge
#[derive(Error, Debug, Clone)]
pub enum ArchiveForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid start password '{start}': {reason}")]
    InvalidStart { start: String, reason: String },

    #[error("Alphabet must contain at least one character")]
    EmptyAlphabet,

    #[error("Invalid maximum length {max_length}: must be at least 1")]
    InvalidMaxLength { max_length: usize },

    #[error(
        "Dictionary is empty{}{}",
        .path.as_ref().map_or(String::new(), |p| format!(" ({})", p)),
        .reason.as_ref().map_or(String::new(), |r| format!(": {}", r))
    )]
    EmptyDictionary {
        path: Option<String>,
        /// Why the file could not be loaded, if it could not be read at all
        reason: Option<String>,
    },

    #[error("Archive is not encrypted: {path}")]
    NotEncrypted { path: String },

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ArchiveForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid start error
    pub fn invalid_start(start: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStart {
            start: start.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty dictionary error
    pub fn empty_dictionary(path: Option<String>) -> Self {
        Self::EmptyDictionary { path, reason: None }
    }

    /// Create an empty-dictionary error for a file that could not be read
    pub fn unreadable_dictionary(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EmptyDictionary {
            path: Some(path.into()),
            reason: Some(reason.into()),
        }
    }

    /// Create a not-encrypted error
    pub fn not_encrypted(path: impl Into<String>) -> Self {
        Self::NotEncrypted { path: path.into() }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error was raised while building a generator, before any
    /// password was tried
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::InvalidStart { .. }
                | Self::EmptyAlphabet
                | Self::InvalidMaxLength { .. }
                | Self::EmptyDictionary { .. }
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your options or .env file", message)
            }
            Self::InvalidStart { start, reason } => {
                format!("❌ Cannot start from '{}': {}\n💡 The start password must only use characters from --chars and fit within --max-length", start, reason)
            }
            Self::EmptyAlphabet => {
                "❌ No characters to build passwords from\n💡 Pass a non-empty --chars value".to_string()
            }
            Self::InvalidMaxLength { max_length } => {
                format!("❌ Maximum length {} is not usable\n💡 Use --max-length 1 or higher", max_length)
            }
            Self::EmptyDictionary { path, reason } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                match reason {
                    Some(reason) => format!("❌ Could not load dictionary{}: {}\n💡 Check that the word list exists and is readable", path_info, reason),
                    None => format!("❌ Dictionary has no words{}\n💡 Provide a file with one password per line", path_info),
                }
            }
            Self::NotEncrypted { path } => {
                format!("⚠️  Archive '{}' is not password protected\n💡 Nothing to recover", path)
            }
            Self::Oracle(err) => {
                format!("❌ Attack aborted: {}\n💡 Check that the archive is readable and not damaged", err)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 The state file may be damaged, start a fresh attack without --resume", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<tokio::task::JoinError> for ArchiveForgeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Attack worker failed: {}", err))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ArchiveForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::ArchiveForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::ArchiveForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::ArchiveForgeError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::ArchiveForgeError::internal(format!($fmt, $($arg)*))
    };
}
