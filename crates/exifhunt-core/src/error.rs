//! Error types for ExifHunt.
//!
//! Errors are split by how a run reacts to them: input errors abort before any
//! file is read, pipeline errors are per-file and always downgraded, report
//! errors end the run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for ExifHunt operations.
#[derive(Error, Debug)]
pub enum ExifHuntError {
    /// The run request is incomplete or contradictory
    #[error("{0}")]
    Input(#[from] InputError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing the report failed
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A report was expected on disk but is not there
    #[error("The report file does not exist: {0}")]
    ReportMissing(PathBuf),
}

/// User-input errors, raised before any media file is touched.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Please select a folder")]
    NoFolderSelected,

    #[error("Folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("Please select at least one file type (images or videos)")]
    NoMediaKind,

    #[error("Please select an output format")]
    NoOutputFormat,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-file pipeline errors. None of these abort a batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image or frame decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Metadata extraction failed
    #[error("Metadata extraction failed for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Thumbnail could not be written
    #[error("Thumbnail failed for {path}: {message}")]
    Thumbnail { path: PathBuf, message: String },

    /// An external tool could not be run or exited with an error
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },
}

/// Report rendering errors. These end the run.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Creating or writing the artifact failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF backend rejected the document
    #[error("PDF error: {0}")]
    Pdf(String),

    /// A configured font file could not be used
    #[error("Cannot use font {path}: {message}")]
    Font { path: PathBuf, message: String },
}

/// Convenience type alias for ExifHunt results.
pub type Result<T> = std::result::Result<T, ExifHuntError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
