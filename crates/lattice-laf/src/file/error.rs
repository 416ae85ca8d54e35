//! Error types for file operations.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for file operations.
#[derive(Debug)]
pub struct FileError {
    kind: FileErrorKind,
    path: Option<PathBuf>,
    source: Option<io::Error>,
}

/// The kind of file error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    /// File or directory not found.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// The rename target already exists.
    AlreadyExists,
    /// Invalid path or filename.
    InvalidPath,
    /// The path is a file, not a directory.
    NotDirectory,
    /// A filter pattern could not be compiled.
    InvalidPattern,
    /// An unknown or unclassified error occurred.
    Other,
}

impl FileError {
    /// Creates a new file error.
    pub fn new(kind: FileErrorKind, path: Option<PathBuf>, source: Option<io::Error>) -> Self {
        Self { kind, path, source }
    }

    /// Creates a file error from an I/O error and path.
    pub fn from_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::from(err)
        }
    }

    /// Creates a "not found" error for the given path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::NotFound, Some(path.into()), None)
    }

    /// Creates a "not a directory" error for the given path.
    pub fn not_directory(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::NotDirectory, Some(path.into()), None)
    }

    /// Creates an "already exists" error for the given path.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::AlreadyExists, Some(path.into()), None)
    }

    /// Creates an error for a glob pattern that failed to compile.
    pub fn invalid_pattern(pattern: &str, message: impl fmt::Display) -> Self {
        Self::new(
            FileErrorKind::InvalidPattern,
            None,
            Some(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid glob pattern '{pattern}': {message}"),
            )),
        )
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> FileErrorKind {
        self.kind
    }

    /// Returns the path involved in the error, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the underlying I/O error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()
    }

    /// Returns true if this error indicates the file was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind == FileErrorKind::NotFound
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", self.kind, path.display()),
            None => match &self.source {
                Some(source) if self.kind == FileErrorKind::InvalidPattern => write!(f, "{source}"),
                _ => write!(f, "{}", self.kind),
            },
        }
    }
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileErrorKind::NotFound => write!(f, "file not found"),
            FileErrorKind::PermissionDenied => write!(f, "permission denied"),
            FileErrorKind::AlreadyExists => write!(f, "file already exists"),
            FileErrorKind::InvalidPath => write!(f, "invalid path"),
            FileErrorKind::NotDirectory => write!(f, "not a directory"),
            FileErrorKind::InvalidPattern => write!(f, "invalid pattern"),
            FileErrorKind::Other => write!(f, "file error"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => FileErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => FileErrorKind::PermissionDenied,
            io::ErrorKind::AlreadyExists => FileErrorKind::AlreadyExists,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidFilename => FileErrorKind::InvalidPath,
            io::ErrorKind::NotADirectory => FileErrorKind::NotDirectory,
            _ => FileErrorKind::Other,
        };
        Self {
            kind,
            path: None,
            source: Some(err),
        }
    }
}

/// A specialized Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;
