//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Generation-service failures are classified into a small set of kinds so that
//! callers can decide between aborting the run and absorbing the failure locally.
//!
//! ## Failure Kinds
//!
//! - **Auth**: Credentials rejected (fail fast)
//! - **RateLimit**: Provider throttled the request
//! - **Connectivity**: Transport never reached the provider
//! - **ServiceStatus**: Provider answered with a non-success status
//! - **Other**: Anything that does not fit the above

use thiserror::Error;

// =============================================================================
// Failure Kinds
// =============================================================================

/// Classified failure of an external text-generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Authentication failed - fail fast
    Auth,
    /// Rate limited by the provider
    RateLimit,
    /// Network/connectivity issues
    Connectivity,
    /// Provider returned an error status
    ServiceStatus,
    /// Unclassified failure
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth => write!(f, "AUTH"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Connectivity => write!(f, "CONNECTIVITY"),
            Self::ServiceStatus => write!(f, "SERVICE_STATUS"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Text-generation error with its classified kind and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Failure kind for routing decisions
    pub kind: FailureKind,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
    /// HTTP status, when the provider answered at all
    pub status: Option<u16>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.kind, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider: None,
            status: None,
        }
    }

    /// Add provider context to existing error
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Attach the HTTP status the provider answered with
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Message shown to the person running the tool, one per failure kind
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Auth => "OpenAI authentication failed. Verify OPENAI_API_KEY is correct \
                 (create a new secret key if needed)."
                .to_string(),
            FailureKind::RateLimit => {
                "OpenAI rate limit reached. Please wait and try again, or reduce concurrency."
                    .to_string()
            }
            FailureKind::Connectivity => "Network error communicating with OpenAI API. \
                 Check your internet connection and retry."
                .to_string(),
            FailureKind::ServiceStatus => {
                format!("OpenAI API returned an error: {}", self.message)
            }
            FailureKind::Other => "Unexpected error during content generation.".to_string(),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider failures onto a [`FailureKind`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let kind = match status {
            401 | 403 => FailureKind::Auth,
            429 => FailureKind::RateLimit,
            _ => FailureKind::ServiceStatus,
        };
        LlmError::new(kind, message).provider(provider).status(status)
    }

    /// Classify a transport-level failure from the HTTP client
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        if let Some(status) = err.status() {
            return Self::classify_http_status(status.as_u16(), &err.to_string(), provider);
        }
        let kind = if err.is_connect() || err.is_timeout() || err.is_request() {
            FailureKind::Connectivity
        } else {
            Self::classify(&err.to_string()).kind
        };
        LlmError::new(kind, err.to_string()).provider(provider)
    }

    /// Classify an error message from any provider
    pub fn classify(message: &str) -> LlmError {
        let lower = message.to_lowercase();

        let kind = if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota exceeded")
        {
            FailureKind::RateLimit
        } else if lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("authentication")
        {
            FailureKind::Auth
        } else if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("unreachable")
        {
            FailureKind::Connectivity
        } else if lower.contains("500")
            || lower.contains("502")
            || lower.contains("503")
            || lower.contains("service unavailable")
            || lower.contains("server error")
        {
            FailureKind::ServiceStatus
        } else {
            FailureKind::Other
        };

        LlmError::new(kind, message)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum WeaveError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Service Errors
    // -------------------------------------------------------------------------
    /// Classified text-generation failure
    #[error("Generation error: {0}")]
    Generation(LlmError),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Research failed: {0}")]
    Research(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<LlmError> for WeaveError {
    fn from(err: LlmError) -> Self {
        WeaveError::Generation(err)
    }
}

pub type Result<T> = std::result::Result<T, WeaveError>;

impl WeaveError {
    /// Message suitable for printing to the terminal
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    /// Failure kind of a generation error, if this is one
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Generation(err) => Some(err.kind),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
