//! Unified error handling for the SpeedyAI relay.
//!
//! Provider adapters fail with [`ProviderError`], the fallback dispatcher
//! with [`DispatchError`], and request handlers convert everything into a
//! [`RelayError`] at the HTTP boundary.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// Failure of a single upstream provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Upstream answered with a non-2xx status.
    Upstream {
        provider: String,
        status: u16,
        body: String,
    },
    /// Connection-level failure (timeout, DNS, refused).
    Transport { provider: String, detail: String },
    /// Upstream answered 2xx but the body did not have the expected shape.
    InvalidResponse { provider: String, detail: String },
    /// No API key configured, so no call was made.
    MissingApiKey { provider: String },
}

impl ProviderError {
    /// Name of the provider that failed.
    pub fn provider(&self) -> &str {
        match self {
            Self::Upstream { provider, .. }
            | Self::Transport { provider, .. }
            | Self::InvalidResponse { provider, .. }
            | Self::MissingApiKey { provider } => provider,
        }
    }

    /// Short machine-readable kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "upstream_rejected",
            Self::Transport { .. } => "transport_failure",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::MissingApiKey { .. } => "missing_api_key",
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream {
                provider,
                status,
                body,
            } => write!(f, "{} API error ({}): {}", provider, status, body),
            Self::Transport { provider, detail } => {
                write!(f, "{} request failed: {}", provider, detail)
            }
            Self::InvalidResponse { provider, detail } => {
                write!(f, "{} returned an unexpected response: {}", provider, detail)
            }
            Self::MissingApiKey { provider } => {
                write!(f, "No API key configured for {}", provider)
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Failure of a fallback dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The provider order was empty.
    NoProviders,
    /// Every provider failed; carries the error of the last one tried.
    Provider(ProviderError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProviders => write!(f, "No providers configured for dispatch"),
            Self::Provider(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoProviders => None,
            Self::Provider(err) => Some(err),
        }
    }
}

impl From<ProviderError> for DispatchError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

/// Error returned from request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Generation failed upstream or could not be dispatched.
    Dispatch(DispatchError),
    /// The request body was malformed or a required field was missing.
    Validation(String),
}

/// Error response body: `{"error": "..."}`.
#[derive(Serialize)]
struct ErrorResponseBody {
    error: String,
}

impl RelayError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error type string.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Dispatch(DispatchError::NoProviders) => "configuration_error",
            Self::Dispatch(DispatchError::Provider(_)) => "provider_error",
            Self::Validation(_) => "validation_error",
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatch(err) => write!(f, "{}", err),
            Self::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<DispatchError> for RelayError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error_type = self.error_type(), "{}", self);
        }
        let body = ErrorResponseBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
