//! Unified error types for sbom-convert.
//!
//! Errors are grouped by the stage that raised them: reading the source
//! document, checking its structure, and producing output. Field-level
//! anomalies inside a document never surface here; the converter degrades
//! them to documented fallbacks instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-convert operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConvertError {
    /// The source document could not be read or parsed
    #[error("Invalid input: {context}")]
    Input {
        context: String,
        #[source]
        source: InputErrorKind,
    },

    /// The source document parsed but cannot be converted
    #[error("Invalid document structure: {context}")]
    Structure {
        context: String,
        #[source]
        source: StructureErrorKind,
    },

    /// The target document could not be produced or written
    #[error("Output failed: {context}")]
    Output {
        context: String,
        #[source]
        source: OutputErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Produced (or supplied) CycloneDX failed structural validation
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific input error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InputErrorKind {
    #[error("No input path given")]
    EmptyPath,

    #[error("Path is a directory, expected a file: {0}")]
    IsDirectory(PathBuf),

    #[error("Input is empty")]
    EmptyContent,

    #[error("Unknown document format - expected SPDX JSON or tag-value")]
    UnknownFormat,

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

/// Specific structural error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StructureErrorKind {
    #[error("Document contains no packages")]
    NoPackages,

    #[error("Document is empty after parsing")]
    EmptyDocument,
}

/// Specific output error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OutputErrorKind {
    #[error("JSON serialization failed: {0}")]
    Serialization(String),

    #[error("Produced document is not valid CycloneDX: {0}")]
    InvalidTarget(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-convert operations
pub type Result<T> = std::result::Result<T, ConvertError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl ConvertError {
    /// Create an input error with context
    pub fn input(context: impl Into<String>, source: InputErrorKind) -> Self {
        Self::Input {
            context: context.into(),
            source,
        }
    }

    /// Create an input error for a missing top-level field
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::input(
            "missing required field",
            InputErrorKind::MissingField {
                field: field.into(),
            },
        )
    }

    /// Create a structural error with context
    pub fn structure(context: impl Into<String>, source: StructureErrorKind) -> Self {
        Self::Structure {
            context: context.into(),
            source,
        }
    }

    /// Create an output error with context
    pub fn output(context: impl Into<String>, source: OutputErrorKind) -> Self {
        Self::Output {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error was caused by the input rather than by output or config
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Input { .. } | Self::Structure { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        Self::input(
            "JSON deserialization",
            InputErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are prepended to the error's existing context, so a
/// failure deep in the reader reads as `"reading input: parsing SPDX: ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<ConvertError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: ConvertError, new_ctx: &str) -> ConvertError {
    match err {
        ConvertError::Input {
            context: existing,
            source,
        } => ConvertError::Input {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ConvertError::Structure {
            context: existing,
            source,
        } => ConvertError::Structure {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ConvertError::Output {
            context: existing,
            source,
        } => ConvertError::Output {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ConvertError::Io {
            path,
            message,
            source,
        } => ConvertError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        ConvertError::Config(msg) => ConvertError::Config(chain_context(new_ctx, &msg)),
        ConvertError::Validation(msg) => ConvertError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as `"new: existing"`.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
