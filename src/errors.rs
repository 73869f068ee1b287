/*!
 * Error types for the potrad application.
 *
 * This module contains custom error types for the different stages of a run,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while reading a catalog
#[derive(Error, Debug)]
pub enum ParseError {
    /// The catalog file could not be opened or read
    #[error("Failed to read catalog {path:?}: {source}")]
    Io {
        /// Path of the catalog
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid UTF-8
    #[error("Catalog is not valid UTF-8: {0}")]
    Encoding(String),

    /// The catalog structure could not be understood
    #[error("Malformed catalog: {0}")]
    Malformed(String),

    /// The parsing strategy is not compiled into this build
    #[error("Parser {0} is not available in this build")]
    Unavailable(&'static str),

    /// Neither strategy produced a single entry
    #[error("No translatable entries found in {0:?}")]
    NoEntries(PathBuf),
}

impl ParseError {
    /// Whether another parsing strategy is worth trying after this error
    pub fn allows_fallback(&self) -> bool {
        matches!(self, Self::Encoding(_) | Self::Malformed(_) | Self::Unavailable(_))
    }
}

/// Errors that can occur when calling the translation service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Connection refused, DNS failure or any other transport problem
    #[error("Network error: {0}")]
    Network(String),

    /// The call did not complete within the per-call timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx response from the service
    #[error("API responded with error: {status_code} - {body}")]
    Service {
        /// HTTP status code
        status_code: u16,
        /// Response body returned by the service
        body: String,
    },

    /// The response did not contain a usable translation
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Transient errors are worth retrying, permanent ones are not
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Service { status_code, .. } => *status_code == 429 || (500..600).contains(status_code),
            Self::MalformedResponse(_) => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Timeout(_) => ErrorKind::Network,
            Self::Service { .. } => ErrorKind::Service,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }
}

/// Classification of a failed entry, as recorded in the run result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Service,
    MalformedResponse,
    /// The job panicked inside its worker
    Panic,
    /// The job was queued but the run was aborted before it started
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Service => "service",
            Self::MalformedResponse => "malformed-response",
            Self::Panic => "panic",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while writing the output file
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failure creating, writing or syncing the staged temporary file
    #[error("Failed to stage output for {path:?}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure replacing the destination with the staged file
    #[error("Failed to replace {path:?}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors in the loaded configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid language code: {0}")]
    Language(String),

    #[error("Invalid service URL {url}: {reason}")]
    Url { url: String, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    Value { field: &'static str, reason: String },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error reading the catalog
    #[error("Catalog error: {0}")]
    Parse(#[from] ParseError),

    /// The run stopped at the first failure
    #[error("Run aborted: entry {index} ({text:?}) failed with {kind}: {detail}")]
    Aborted {
        index: usize,
        text: String,
        kind: ErrorKind,
        detail: String,
    },

    /// Error writing the output file
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Unknown(_) => 1,
            Self::Parse(_) => 2,
            Self::Aborted { .. } => 3,
            Self::Output(_) => 4,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
