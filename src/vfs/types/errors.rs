/*!
 * VFS Error Types
 * Structured, type-safe error handling for filesystem operations
 */

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// VFS operation result
///
/// # Must Use
/// VFS operations can fail and must be handled to prevent data loss
#[must_use = "VFS operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// Canonical failure kinds surfaced by providers and the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    IsDirectory,
    NotAFile,
    FileExists,
    NotEmpty,
    InvalidPath,
    NoSpace,
}

impl ErrorKind {
    /// Errno-style code for collaborators that map kinds to exit statuses
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            ErrorKind::NotFound => 2,
            ErrorKind::AccessDenied => 13,
            ErrorKind::FileExists => 17,
            ErrorKind::NotAFile => 20,
            ErrorKind::IsDirectory => 21,
            ErrorKind::InvalidPath => 22,
            ErrorKind::NoSpace => 28,
            ErrorKind::NotEmpty => 39,
        }
    }

    /// Stable snake_case name, used as a metrics label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::IsDirectory => "is_directory",
            ErrorKind::NotAFile => "not_a_file",
            ErrorKind::FileExists => "file_exists",
            ErrorKind::NotEmpty => "not_empty",
            ErrorKind::InvalidPath => "invalid_path",
            ErrorKind::NoSpace => "no_space",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            ErrorKind::NotFound => "Not found",
            ErrorKind::AccessDenied => "Access denied",
            ErrorKind::IsDirectory => "Is a directory",
            ErrorKind::NotAFile => "Not a file",
            ErrorKind::FileExists => "File exists",
            ErrorKind::NotEmpty => "Directory not empty",
            ErrorKind::InvalidPath => "Invalid path",
            ErrorKind::NoSpace => "No space left",
        };
        f.write_str(text)
    }
}

/// VFS error: a canonical kind plus the offending path
///
/// The path is always non-empty. `code` carries a native error code
/// (an OS errno when the failure came from the host) for logging only.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
#[error("{kind}: {path}{}", detail_suffix(.detail))]
pub struct VfsError {
    pub kind: ErrorKind,
    #[serde(deserialize_with = "deserialize_nonempty_string")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" ({detail})"),
        None => String::new(),
    }
}

impl VfsError {
    /// Build an error of the given kind for a path
    pub fn new(kind: ErrorKind, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind,
            path: if path.is_empty() { "<empty>".to_string() } else { path },
            code: None,
            detail: None,
        }
    }

    /// Attach a human-readable detail message
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach a native error code
    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Re-point the error at a user-visible path
    #[must_use]
    pub(crate) fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !path.is_empty() {
            self.path = path;
        }
        self
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, path)
    }

    pub fn access_denied(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, path)
    }

    pub fn is_directory(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::IsDirectory, path)
    }

    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAFile, path)
    }

    pub fn file_exists(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileExists, path)
    }

    pub fn not_empty(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotEmpty, path)
    }

    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPath, path)
    }

    pub fn no_space(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoSpace, path)
    }

    /// Classify a host I/O failure against a VFS path
    ///
    /// Known kinds are preserved. Anything unclassifiable becomes
    /// `InvalidPath` with the original message appended.
    pub fn from_io(err: &std::io::Error, path: impl Into<String>) -> Self {
        use std::io::ErrorKind as Io;

        let kind = match err.kind() {
            Io::NotFound => Some(ErrorKind::NotFound),
            Io::PermissionDenied => Some(ErrorKind::AccessDenied),
            Io::AlreadyExists => Some(ErrorKind::FileExists),
            Io::IsADirectory => Some(ErrorKind::IsDirectory),
            Io::NotADirectory => Some(ErrorKind::NotAFile),
            Io::DirectoryNotEmpty => Some(ErrorKind::NotEmpty),
            Io::StorageFull | Io::FileTooLarge => Some(ErrorKind::NoSpace),
            Io::InvalidInput => Some(ErrorKind::InvalidPath),
            _ => None,
        };

        let error = match kind {
            Some(kind) => Self::new(kind, path),
            None => Self::invalid_path(path).with_detail(err.to_string()),
        };

        match err.raw_os_error() {
            Some(code) => error.with_code(code),
            None => error,
        }
    }
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io(&err, "<host>")
    }
}

/// Deserialize and validate non-empty string for error paths
fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error path must not be empty"));
    }
    Ok(s)
}
