//! Typed error handling for the vista framework
//!
//! Consumers observe failures through a small typed hierarchy rather than a
//! generic `anyhow::Error`, so a view can distinguish a missing record from a
//! transport outage or a malformed payload.
//!
//! # Error Categories
//!
//! - [`TransportError`]: network or HTTP failure, carries the status code
//! - [`NotFoundError`]: the requested record does not exist (HTTP 404)
//! - [`ValidationError`]: malformed filter or mutation payload, detected
//!   before dispatch
//! - [`ConfigError`]: client configuration problems
//!
//! # Example
//!
//! ```rust,ignore
//! match controller.delete(&id).await {
//!     Ok(()) => {}
//!     Err(e) if e.is_not_found() => toast("Record already removed"),
//!     Err(e) => toast(&e.to_string()),
//! }
//! ```

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the vista framework
#[derive(Debug, Clone)]
pub enum VistaError {
    /// Network or HTTP failure
    Transport(TransportError),

    /// Requested record does not exist
    NotFound(NotFoundError),

    /// Malformed filter or mutation payload, rejected before dispatch
    Validation(ValidationError),

    /// Client configuration problem
    Config(ConfigError),

    /// Internal framework errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for VistaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VistaError::Transport(e) => write!(f, "{}", e),
            VistaError::NotFound(e) => write!(f, "{}", e),
            VistaError::Validation(e) => write!(f, "{}", e),
            VistaError::Config(e) => write!(f, "{}", e),
            VistaError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for VistaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VistaError::Transport(e) => Some(e),
            VistaError::NotFound(e) => Some(e),
            VistaError::Validation(e) => Some(e),
            VistaError::Config(e) => Some(e),
            VistaError::Internal(_) => None,
        }
    }
}

impl VistaError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            VistaError::Transport(_) => "TRANSPORT_ERROR",
            VistaError::NotFound(_) => "NOT_FOUND",
            VistaError::Validation(_) => "VALIDATION_ERROR",
            VistaError::Config(_) => "CONFIG_ERROR",
            VistaError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error represents a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(self, VistaError::NotFound(_))
    }

    /// The HTTP status carried by the underlying failure, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            VistaError::Transport(e) => e.status,
            VistaError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<TransportError> for VistaError {
    fn from(e: TransportError) -> Self {
        VistaError::Transport(e)
    }
}

impl From<NotFoundError> for VistaError {
    fn from(e: NotFoundError) -> Self {
        VistaError::NotFound(e)
    }
}

impl From<ValidationError> for VistaError {
    fn from(e: ValidationError) -> Self {
        VistaError::Validation(e)
    }
}

impl From<ConfigError> for VistaError {
    fn from(e: ConfigError) -> Self {
        VistaError::Config(e)
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Network or HTTP failure
///
/// `status` is `None` for failures that never produced a response (connection
/// refused, DNS, timeout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    /// Failure with an HTTP status code
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure without a response (network-level)
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "network error: {}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

// =============================================================================
// Not Found
// =============================================================================

/// The requested record does not exist
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{resource} {id} not found")]
pub struct NotFoundError {
    /// Singular resource name (e.g. "booking")
    pub resource: &'static str,
    pub id: Uuid,
}

impl NotFoundError {
    pub fn new(resource: &'static str, id: Uuid) -> Self {
        Self { resource, id }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Malformed filter or mutation payload, detected before dispatch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("filter keys must not be blank")]
    BlankFilterKey,

    #[error("{operation} payload must be a JSON object")]
    PayloadNotObject { operation: &'static str },

    #[error("invalid {operation} payload: {message}")]
    Payload {
        operation: &'static str,
        message: String,
    },

    #[error("status transition requires a non-empty status")]
    EmptyStatus,
}

// =============================================================================
// Config Errors
// =============================================================================

/// Client configuration problems
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid bearer token: {0}")]
    InvalidBearerToken(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}
