//! Typed filesystem failures.
//!
//! Every filesystem primitive in the core returns `Result<T, FileError>` so callers can
//! turn failures into data (skipped entries, `DeletionResult::failures`) instead of
//! propagating them.

use serde::Serialize;
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FileError {
    #[error("path no longer exists")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("path is in use by another process")]
    InUse,

    #[error("path is protected")]
    Protected,

    #[error("{0}")]
    Io(String),
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FileError::NotFound,
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied,
            _ if is_in_use(&err) => FileError::InUse,
            _ => FileError::Io(err.to_string()),
        }
    }
}

#[cfg(windows)]
fn is_in_use(err: &io::Error) -> bool {
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    matches!(err.raw_os_error(), Some(32) | Some(33))
}

#[cfg(unix)]
fn is_in_use(err: &io::Error) -> bool {
    // EBUSY
    err.raw_os_error() == Some(16)
}

#[cfg(not(any(windows, unix)))]
fn is_in_use(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_kinds_map_to_variants() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(FileError::from(missing), FileError::NotFound);

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(FileError::from(denied), FileError::PermissionDenied);

        let other = io::Error::new(io::ErrorKind::Other, "disk on fire");
        assert_eq!(FileError::from(other), FileError::Io("disk on fire".to_string()));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(FileError::NotFound.to_string(), "path no longer exists");
        assert_eq!(FileError::Protected.to_string(), "path is protected");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_string(&FileError::PermissionDenied).unwrap();
        assert_eq!(json, r#"{"kind":"permission_denied"}"#);
    }
}
