// src/error.rs
//! Application error types with structured error handling.
//!
//! Each layer of the pipeline has its own vocabulary: loading a dataset
//! (`LoadError`), checking a page against its schema (`SchemaViolation`),
//! and talking to Notion (`PublishError`). `AppError` ties them together
//! and decides which failures are worth retrying.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded, back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError | Self::Conflict => {
                true
            }
            Self::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Why a dataset file could not be turned into records.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Dataset file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON array of records in {}, found {found}", path.display())]
    NotAnArray { path: PathBuf, found: &'static str },
}

/// A page property set that the target database would reject.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("Property '{property}' is not declared in schema '{schema}'")]
    UnknownProperty { schema: String, property: String },

    #[error("Property '{property}' is declared as {expected} but the page sets {actual}")]
    KindMismatch {
        property: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Option '{option}' is not declared for property '{property}'")]
    UndeclaredOption { property: String, option: String },
}

/// The publish step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    SchemaCreation,
    PageCreation,
    BlockAppend,
    Relation,
    SchemaViolation,
}

impl fmt::Display for PublishErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SchemaCreation => "schema creation",
            Self::PageCreation => "page creation",
            Self::BlockAppend => "block append",
            Self::Relation => "relation update",
            Self::SchemaViolation => "schema check",
        };
        f.write_str(label)
    }
}

/// A failed call against the remote workspace, after retries.
#[derive(Error, Debug)]
#[error("{kind} failed for '{target}': {source}")]
pub struct PublishError {
    pub kind: PublishErrorKind,
    pub target: String,
    #[source]
    pub source: Box<AppError>,
}

impl PublishError {
    pub fn new(kind: PublishErrorKind, target: impl Into<String>, source: AppError) -> Self {
        Self {
            kind,
            target: target.into(),
            source: Box::new(source),
        }
    }

    /// The schema violation behind this error, when the page never left the process.
    pub fn violation(&self) -> Option<&SchemaViolation> {
        match self.source.as_ref() {
            AppError::SchemaViolation(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    SchemaViolation(#[from] SchemaViolation),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl AppError {
    /// Whether another attempt at the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkFailure(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            AppError::NotionService { code, .. } => code.is_retryable(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
