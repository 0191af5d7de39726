//! Error types for the report tool.

use std::error::Error;
use std::fmt;
use std::io;

/// Failure while loading a snapshot or writing the report.
#[derive(Debug)]
pub enum CliError {
    /// Reading the snapshot or writing output failed
    Io(io::Error),
    /// The snapshot is not valid JSON for the expected layout
    Json(serde_json::Error),
    /// The snapshot parsed but describes an impossible tree
    Snapshot(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(err) => write!(f, "IO error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Snapshot(msg) => write!(f, "Snapshot error: {msg}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            CliError::Json(err) => Some(err),
            CliError::Snapshot(_) => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CliError::Snapshot("bad move".to_string());
        assert_eq!(err.to_string(), "Snapshot error: bad move");
        assert!(err.source().is_none());

        let err = CliError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert_eq!(err.to_string(), "IO error: missing");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: CliError = json_err.into();
        assert!(matches!(err, CliError::Json(_)));
        assert!(err.to_string().starts_with("JSON error: "));
    }
}
