//! Error handling types
//!
//! Surface taxonomy: configuration, transport, not-found/precondition,
//! bad-request, partial-failure, cancelled. Adapters and the
//! orchestrator construct these via the associated functions below rather
//! than building variants by hand.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the retrieval core
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing or serialization error
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration error: missing endpoint, missing embedding provider
    /// where required, unknown strategy, missing schema where required,
    /// document fails schema validation.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transport error: network failure, timeout, cluster-not-ready.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Not-found / precondition error: missing collection/class/extension.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Bad-request error: empty query with no vector and no auto-embed,
    /// invalid threshold, unknown metadata field, unknown strategy.
    #[error("bad request: {message}")]
    BadRequest {
        /// Description of the invalid request
        message: String,
    },

    /// Partial-failure error: batch write/delete with a nonzero failure
    /// count. Carries aggregate counts and the first underlying cause.
    #[error("partial failure: {succeeded} succeeded, {failed} failed; first cause: {first_cause}")]
    PartialFailure {
        /// Number of items that succeeded
        succeeded: usize,
        /// Number of items that failed
        failed: usize,
        /// First failing reason encountered
        first_cause: String,
    },

    /// Cancellation error: the caller's context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal error not covered by a more specific variant.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with an underlying cause
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error with an underlying cause
    pub fn transport_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a bad-request error
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a partial-failure error
    pub fn partial_failure<S: Into<String>>(succeeded: usize, failed: usize, first_cause: S) -> Self {
        Self::PartialFailure {
            succeeded,
            failed,
            first_cause: first_cause.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error represents a nonzero-failure batch outcome
    pub fn is_partial_failure(&self) -> bool {
        matches!(self, Self::PartialFailure { .. })
    }
}
