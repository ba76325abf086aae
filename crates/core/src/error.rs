//! Error taxonomy for the 4D turbulence pipeline
//!
//! Every stage fails fast. Errors carry enough context (frequency index,
//! file path, plane index) to locate the failing unit and rerun the batch.

use std::fmt;
use std::path::{Path, PathBuf};

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EvoTurbError>;

/// Broad category of an [`EvoTurbError`], independent of attached context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or inconsistent configuration
    Configuration,
    /// Coherence matrix could not be factorized
    Numerical,
    /// Binary or summary file content did not match the expected layout
    FileFormat,
    /// File could not be opened, read or written
    Io,
}

/// Errors raised by the turbulence pipeline
#[derive(Debug)]
pub enum EvoTurbError {
    /// Unknown model/class name, bad plane offsets, inconsistent grid
    Configuration(String),
    /// Coherence matrix at one frequency is not positive semi-definite
    Numerical {
        /// Index into the frequency vector
        frequency_index: usize,
        /// Frequency (Hz)
        frequency: f64,
        /// What went wrong
        message: String,
    },
    /// Unexpected header marker, truncated payload, missing summary field
    FileFormat {
        /// File being decoded or encoded
        path: PathBuf,
        /// What went wrong
        message: String,
    },
    /// Missing or unreadable file
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// Error raised while handling a single plane
    Plane {
        /// Plane index in configuration order
        plane: usize,
        /// Wrapped error
        source: Box<EvoTurbError>,
    },
}

impl EvoTurbError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a file format error for `path`
    pub fn file_format(path: &Path, message: impl Into<String>) -> Self {
        Self::FileFormat {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an I/O error for `path`
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the plane index this error was raised for
    #[must_use]
    pub fn in_plane(self, plane: usize) -> Self {
        Self::Plane {
            plane,
            source: Box::new(self),
        }
    }

    /// Category of the underlying error, looking through plane context
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Numerical { .. } => ErrorKind::Numerical,
            Self::FileFormat { .. } => ErrorKind::FileFormat,
            Self::Io { .. } => ErrorKind::Io,
            Self::Plane { source, .. } => source.kind(),
        }
    }
}

impl fmt::Display for EvoTurbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Self::Numerical {
                frequency_index,
                frequency,
                message,
            } => write!(
                f,
                "Numerical error at frequency #{frequency_index} ({frequency:.6} Hz): {message}"
            ),
            Self::FileFormat { path, message } => {
                write!(f, "File format error in {}: {message}", path.display())
            }
            Self::Io { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
            Self::Plane { plane, source } => write!(f, "Plane {plane}: {source}"),
        }
    }
}

impl std::error::Error for EvoTurbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Plane { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
