use std::path::Path;

use crate::regex::ParseError;

pub type ScanResult<T> = Result<T, ScanError>;

/// Errors surfaced while compiling patterns or reading sources. The display
/// forms double as the user-facing diagnostics, so they follow the
/// lowercased `source: description` convention throughout.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{path}: no such file or directory")]
    FileNotFound { path: String },

    #[error("{path}: permission denied")]
    PermissionDenied { path: String },

    #[error("{path}: is a directory")]
    IsDirectory { path: String },

    #[error("{path}: not a directory")]
    NotADirectory { path: String },

    #[error("{path}: invalid utf-8")]
    Encoding { path: String },

    #[error("{pattern}: invalid pattern")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: ParseError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    pub fn file_not_found(path: &Path) -> Self {
        ScanError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn permission_denied(path: &Path) -> Self {
        ScanError::PermissionDenied {
            path: path.display().to_string(),
        }
    }

    pub fn is_directory(path: &Path) -> Self {
        ScanError::IsDirectory {
            path: path.display().to_string(),
        }
    }

    pub fn not_a_directory(path: &Path) -> Self {
        ScanError::NotADirectory {
            path: path.display().to_string(),
        }
    }

    pub fn encoding(path: &Path) -> Self {
        ScanError::Encoding {
            path: path.display().to_string(),
        }
    }

    pub fn invalid_pattern(pattern: &str, source: ParseError) -> Self {
        ScanError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        ScanError::Config(msg.into())
    }

    /// Maps an open/read failure onto the diagnostic for `path`.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ScanError::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => ScanError::permission_denied(path),
            _ => ScanError::Io(err),
        }
    }
}
