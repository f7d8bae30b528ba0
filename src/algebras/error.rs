//! Error types for algebra traits.
//!
//! A [`FetchError`] is what a page source reports when a page could not be
//! produced. The list controller never lets one escape: it is folded into
//! the status flags and logged. The type is therefore `Clone + PartialEq`,
//! so it can travel as plain data through the event loop and into tests.

use std::any::Any;
use std::fmt;

/// Error that can occur while fetching a page.
///
/// This is the error type for [`PageSource`](super::PageSource) operations
/// and for the closures accepted by [`ListConfig::new`](crate::ListConfig::new).
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The requested collection was not found (404).
    NotFound { resource: String },

    /// Authentication failed or the credentials lack permission.
    Unauthorized { reason: String },

    /// The API rate limit was exceeded.
    RateLimited { retry_after_seconds: Option<u64> },

    /// The request was malformed or invalid.
    InvalidRequest { reason: String },

    /// The API answered with an error status.
    ApiError { status: u16, message: String },

    /// Network or transport error.
    Transport { message: String },

    /// The response could not be parsed.
    MalformedResponse { reason: String },

    /// An operation timed out.
    Timeout { operation: String },

    /// The fetch panicked before producing a result.
    Panicked { message: String },

    /// Some other error occurred.
    Other { message: String },
}

impl FetchError {
    /// Convenience constructor for ad-hoc failures.
    pub fn other(message: impl fmt::Display) -> Self {
        Self::Other {
            message: message.to_string(),
        }
    }

    /// Builds a `Panicked` error from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&'static str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked { message }
    }

    /// Returns `true` if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Timeout { .. }
                | Self::Transport { .. }
                | Self::ApiError {
                    status: 408 | 429 | 500..=599,
                    ..
                }
        )
    }

    /// Returns `true` if this error means the resource doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { resource } => write!(f, "Not found: {}", resource),
            Self::Unauthorized { reason } => write!(f, "Unauthorized: {}", reason),
            Self::RateLimited {
                retry_after_seconds,
            } => {
                write!(f, "Rate limited")?;
                if let Some(seconds) = retry_after_seconds {
                    write!(f, " (retry after {}s)", seconds)?;
                }
                Ok(())
            }
            Self::InvalidRequest { reason } => write!(f, "Invalid request: {}", reason),
            Self::ApiError { status, message } => {
                write!(f, "API error [{}]: {}", status, message)
            }
            Self::Transport { message } => write!(f, "Transport error: {}", message),
            Self::MalformedResponse { reason } => write!(f, "Malformed response: {}", reason),
            Self::Timeout { operation } => write!(f, "Timeout during: {}", operation),
            Self::Panicked { message } => write!(f, "Fetch panicked: {}", message),
            Self::Other { message } => write!(f, "Error: {}", message),
        }
    }
}

impl std::error::Error for FetchError {}

// ==============================================================================
// Conversion from existing errors
// ==============================================================================

impl From<crate::error::AppError> for FetchError {
    fn from(err: crate::error::AppError) -> Self {
        use crate::error::AppError;

        match err {
            AppError::ApiStatus { status, message } => match status.as_u16() {
                404 => Self::NotFound { resource: message },
                401 | 403 => Self::Unauthorized { reason: message },
                429 => Self::RateLimited {
                    retry_after_seconds: None,
                },
                400 | 422 => Self::InvalidRequest { reason: message },
                code => Self::ApiError {
                    status: code,
                    message,
                },
            },
            AppError::NetworkFailure(ref source) if source.is_timeout() => Self::Timeout {
                operation: err.to_string(),
            },
            AppError::NetworkFailure(_) => Self::Transport {
                message: err.to_string(),
            },
            AppError::MalformedResponse(reason) => Self::MalformedResponse { reason },
            _ => Self::Other {
                message: err.to_string(),
            },
        }
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            message: format!("{:#}", err),
        }
    }
}
