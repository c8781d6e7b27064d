//! Error types for FRT Intake.
//!
//! User input never produces one of these: bad answers are re-prompted by the
//! dialog engine. These cover startup configuration, video ingestion and the
//! pose assessment collaborators.

use std::path::PathBuf;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Assessment error: {0}")]
    Assessment(#[from] AssessmentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and question catalog errors. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Video ingestion errors.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File not found: {}. Please check the path and try again.", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid file type '{extension}'. Please upload a video file ({allowed}).")]
    UnsupportedExtension { extension: String, allowed: String },

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pose assessment errors.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("Recording not found: {}", .0.display())]
    RecordingNotFound(PathBuf),

    #[error("Assessment source unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for FRT Intake.
pub type Result<T> = std::result::Result<T, Error>;
