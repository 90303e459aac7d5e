//! Error types for NSoT operations.
//!
//! Every failure the client can produce is a variant of [`Error`]. Layers add
//! context with [`Error::context`] rather than replacing the underlying
//! failure, so [`Error::root_cause`] always reaches the original condition.

use thiserror::Error;

/// Reasons the authentication endpoint did not yield a token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The endpoint answered with something other than `200 OK`.
    #[error("unexpected status {0}")]
    UnexpectedStatus(String),

    /// The body could not be read or was not JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The envelope status was not `ok`.
    #[error("rejected with status `{0}`")]
    Rejected(String),

    /// JSON was valid but `data.auth_token` was missing or not a string.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Main error type for NSoT operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Connection or protocol failure below HTTP
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded the transport timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Authentication did not produce a token
    #[error("Authentication failed: {0}")]
    Auth(AuthFailure),

    /// HTTP status outside the accepted success set
    #[error("API error: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Status line, followed by the response body when present
        message: String,
    },

    /// The HTTP call succeeded but the envelope status was not `ok`
    #[error("API returned status `{0}`")]
    Domain(String),

    /// Response body unreadable, not JSON, or missing expected fields
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A lookup by name or CIDR matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied values failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Base URL and resource path did not form a valid URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request could not be assembled
    #[error("Failed to build request: {0}")]
    Build(String),

    /// Underlying error annotated with the operation that hit it
    #[error("{context}: {source}")]
    Context {
        /// Operation and resource being worked on
        context: String,
        /// The wrapped failure
        #[source]
        source: Box<Error>,
    },
}

/// Specialized result type for NSoT operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap this error with a description of the operation that failed.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip every [`Error::Context`] layer and return the original failure.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Returns the error code for this error type.
    ///
    /// Context layers report the code of their root cause.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::Domain(_) => "DOMAIN_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::Build(_) => "BUILD_ERROR",
            Self::Context { source, .. } => source.error_code(),
        }
    }

    /// HTTP status carried by an [`Error::Api`] root cause.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self.root_cause() {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for failures a caller could reasonably retry.
    ///
    /// The client itself never retries.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self.root_cause() {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

impl From<AuthFailure> for Error {
    fn from(failure: AuthFailure) -> Self {
        Self::Auth(failure)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_builder() {
            Self::Build(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

// Only `NsotConfig` derives `Validate`, so a failed check is a config problem.
impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(format!("Invalid configuration: {err}"))
    }
}
