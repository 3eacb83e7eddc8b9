//! VFS error types.

use std::io;
use thiserror::Error;

use crate::types::FileType;

/// VFS error type.
///
/// Every failing operation returns one of these; nothing in the store
/// panics on a bad path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// A required path segment does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A node exists but is of the wrong kind.
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: FileType,
        found: FileType,
    },

    /// Non-recursive removal of a directory that still has children.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Path already has an entry.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The operation needs a parent directory but the path names the root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Rename would move a directory beneath itself.
    #[error("cannot move {from} into its own subtree at {to}")]
    InvalidMove { from: String, to: String },

    /// File content is not valid UTF-8.
    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(String),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a TypeMismatch error.
    pub fn type_mismatch(path: impl Into<String>, expected: FileType, found: FileType) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create a DirectoryNotEmpty error.
    pub fn directory_not_empty(path: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty(path.into())
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Returns true for [`VfsError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        let kind = match &e {
            VfsError::NotFound(_) => io::ErrorKind::NotFound,
            VfsError::TypeMismatch { expected, .. } if expected.is_dir() => {
                io::ErrorKind::NotADirectory
            }
            VfsError::TypeMismatch { found, .. } if found.is_dir() => io::ErrorKind::IsADirectory,
            VfsError::TypeMismatch { .. } => io::ErrorKind::InvalidInput,
            VfsError::DirectoryNotEmpty(_) => io::ErrorKind::DirectoryNotEmpty,
            VfsError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            VfsError::InvalidPath(_) | VfsError::InvalidMove { .. } => {
                io::ErrorKind::InvalidInput
            }
            VfsError::InvalidUtf8(_) => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, e)
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;
