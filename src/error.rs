//! Error types for loading, editing, and saving INI documents.
//!
//! Every fallible operation returns [`IniError`].  Callers that only need to
//! branch on the failure category match on [`IniError::kind`]; hosts that
//! aggregate errors with [`anyhow`](https://docs.rs/anyhow) can convert with
//! the standard `?` operator.
//!
//! # Error taxonomy
//!
//! ```text
//! IniError
//! ├── InvalidArgument — empty name, key, value, or path
//! ├── NotFound        — set_value on a key the section does not hold
//! ├── AlreadyExists   — add_key with a key the section already holds
//! ├── MalformedInput  — a line matches neither grammar
//! ├── Structural      — a key-value line before any section header
//! ├── LineTooLong     — a line does not fit the per-line buffer
//! ├── Io              — open/read/write/rename failure
//! └── OutOfMemory     — an owned copy could not be allocated
//! ```

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = IniError> = std::result::Result<T, E>;

/// Errors produced by document loading, mutation, and saving.
#[derive(Error, Debug)]
pub enum IniError {
    /// A required argument was empty.
    #[error("invalid argument: {what} must not be empty")]
    InvalidArgument {
        /// Name of the offending argument (e.g. `"section name"`).
        what: &'static str,
    },

    /// The key is not present in the section.
    #[error("key '{key}' not found")]
    NotFound {
        /// Key that was looked up.
        key: String,
    },

    /// The key is already present in the section.
    #[error("key '{key}' already exists")]
    AlreadyExists {
        /// Key that was inserted twice.
        key: String,
    },

    /// A non-blank, non-comment line matches neither the section-header nor
    /// the key-value grammar.
    #[error("malformed input at line {line}: {content}")]
    MalformedInput {
        /// 1-based line number.
        line: usize,
        /// The offending line with surrounding whitespace trimmed.
        content: String,
    },

    /// A key-value line appeared before any section header.
    #[error("key-value pair outside of a section at line {line}: {content}")]
    Structural {
        /// 1-based line number.
        line: usize,
        /// The offending line with surrounding whitespace trimmed.
        content: String,
    },

    /// A line exceeded the per-line buffer.
    #[error("line {line} exceeds the maximum length of {limit} bytes")]
    LineTooLong {
        /// 1-based line number.
        line: usize,
        /// Maximum accepted line length in bytes.
        limit: usize,
    },

    /// A filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path the failing operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Allocating an owned string failed.
    #[error("out of memory")]
    OutOfMemory(#[from] TryReserveError),
}

/// Fieldless discriminant of [`IniError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`IniError::InvalidArgument`].
    InvalidArgument,
    /// See [`IniError::NotFound`].
    NotFound,
    /// See [`IniError::AlreadyExists`].
    AlreadyExists,
    /// See [`IniError::MalformedInput`].
    MalformedInput,
    /// See [`IniError::Structural`].
    Structural,
    /// See [`IniError::LineTooLong`].
    LineTooLong,
    /// See [`IniError::Io`].
    Io,
    /// See [`IniError::OutOfMemory`].
    OutOfMemory,
}

impl IniError {
    /// Return the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Structural { .. } => ErrorKind::Structural,
            Self::LineTooLong { .. } => ErrorKind::LineTooLong,
            Self::Io { .. } => ErrorKind::Io,
            Self::OutOfMemory(_) => ErrorKind::OutOfMemory,
        }
    }

    /// Return the operating-system error code behind an [`IniError::Io`],
    /// if there is one.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn invalid(what: &'static str) -> Self {
        Self::InvalidArgument { what }
    }
}
