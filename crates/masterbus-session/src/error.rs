//! Error types for session operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving, loading, or applying sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Settings slot name was not one of A, B, C, D
    #[error("unknown settings slot: {0}")]
    UnknownSlot(String),
}

impl SessionError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SessionError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SessionError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SessionError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = SessionError::read_file("/some/path", mock_io_err());
        assert!(
            matches!(err, SessionError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/path"))
        );
    }

    #[test]
    fn write_file_factory_produces_correct_variant() {
        let err = SessionError::write_file("/out/path", mock_io_err());
        assert!(
            matches!(err, SessionError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/path"))
        );
    }

    #[test]
    fn read_file_display_includes_path() {
        let err = SessionError::read_file("/a/b.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/b.toml"), "got: {msg}");
    }

    #[test]
    fn unknown_slot_display() {
        let err = SessionError::UnknownSlot("e".to_string());
        assert_eq!(err.to_string(), "unknown settings slot: e");
    }

    #[test]
    fn io_variants_expose_source() {
        assert!(
            SessionError::read_file("/x", mock_io_err())
                .source()
                .is_some()
        );
        assert!(
            SessionError::write_file("/x", mock_io_err())
                .source()
                .is_some()
        );
    }

    #[test]
    fn unknown_slot_source_is_none() {
        assert!(SessionError::UnknownSlot("x".to_string()).source().is_none());
    }
}
