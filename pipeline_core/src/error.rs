//! Error taxonomy for the requirement-processing pipeline.
//!
//! Provides a single categorized error type shared across every stage of
//! the pipeline. Provider and Git failures are wrapped (not unwrapped) so
//! that the queue's retry policy can inspect `category()` without string
//! matching.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Create PipelineError taxonomy shared across pipeline stages.

/// Broad category a `PipelineError` falls into.
///
/// Mirrors the taxonomy of client-facing failure classes; an (unbuilt) HTTP
/// layer would map each variant to a status code directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Client input fails schema validation.
    Validation,
    /// Referenced entity does not exist.
    NotFound,
    /// Caller is not authenticated.
    Unauthorized,
    /// Caller is authenticated but not permitted.
    Forbidden,
    /// Requested state transition is not permitted.
    Conflict,
    /// Caller exceeded a rate limit.
    TooManyRequests,
    /// Startup or configuration defect.
    Config,
    /// LLM provider or Git remote failure; retryable inside the queue.
    Provider,
    /// Uncategorized failure.
    Unknown,
}

/// Unified pipeline error type.
///
/// # Examples
///
/// ```
/// use pipeline_core::error::{ErrorCategory, PipelineError};
///
/// let err = PipelineError::provider_retryable("openai-chat", "connection reset");
/// assert_eq!(err.category(), ErrorCategory::Provider);
/// assert!(err.is_retryable());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Client input fails schema.
    #[error("validation error: {message}")]
    Validation { message: std::string::String },

    /// Unknown task id.
    #[error("not found: {message}")]
    NotFound { message: std::string::String },

    /// Guard rejection: unauthenticated.
    #[error("unauthorized: {message}")]
    Unauthorized { message: std::string::String },

    /// Guard rejection: authenticated but forbidden.
    #[error("forbidden: {message}")]
    Forbidden { message: std::string::String },

    /// Status transition not permitted.
    #[error("conflict: {message}")]
    Conflict { message: std::string::String },

    /// Rate limit exceeded.
    #[error("too many requests: {message}")]
    TooManyRequests { message: std::string::String },

    /// Startup or configuration defect.
    #[error("config error: {message}")]
    Config { message: std::string::String },

    /// LLM provider or Git remote failure. `retryable` distinguishes a
    /// transport/non-2xx failure (retryable) from a malformed response
    /// body (non-retryable parse error).
    #[error("provider error ({source_name}, retryable={retryable}): {message}")]
    Provider {
        source_name: std::string::String,
        message: std::string::String,
        retryable: bool,
    },

    /// Anything else.
    #[error("unknown error: {message}")]
    Unknown { message: std::string::String },
}

impl PipelineError {
    /// Builds a validation error.
    pub fn validation(message: impl std::fmt::Display) -> Self {
        PipelineError::Validation { message: message.to_string() }
    }

    /// Builds a not-found error.
    pub fn not_found(message: impl std::fmt::Display) -> Self {
        PipelineError::NotFound { message: message.to_string() }
    }

    /// Builds a conflict error, typically an illegal status transition.
    pub fn conflict(message: impl std::fmt::Display) -> Self {
        PipelineError::Conflict { message: message.to_string() }
    }

    /// Builds a config error.
    pub fn config(message: impl std::fmt::Display) -> Self {
        PipelineError::Config { message: message.to_string() }
    }

    /// Builds a retryable provider error (transport failure, non-2xx response).
    pub fn provider_retryable(source_name: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        PipelineError::Provider {
            source_name: source_name.to_string(),
            message: message.to_string(),
            retryable: true,
        }
    }

    /// Builds a non-retryable provider error (malformed response body).
    pub fn provider_parse(source_name: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        PipelineError::Provider {
            source_name: source_name.to_string(),
            message: message.to_string(),
            retryable: false,
        }
    }

    /// Builds an unknown/uncategorized error.
    pub fn unknown(message: impl std::fmt::Display) -> Self {
        PipelineError::Unknown { message: message.to_string() }
    }

    /// Returns the broad category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Validation { .. } => ErrorCategory::Validation,
            PipelineError::NotFound { .. } => ErrorCategory::NotFound,
            PipelineError::Unauthorized { .. } => ErrorCategory::Unauthorized,
            PipelineError::Forbidden { .. } => ErrorCategory::Forbidden,
            PipelineError::Conflict { .. } => ErrorCategory::Conflict,
            PipelineError::TooManyRequests { .. } => ErrorCategory::TooManyRequests,
            PipelineError::Config { .. } => ErrorCategory::Config,
            PipelineError::Provider { .. } => ErrorCategory::Provider,
            PipelineError::Unknown { .. } => ErrorCategory::Unknown,
        }
    }

    /// True if the queue should retry the job that produced this error.
    ///
    /// Only `Provider` errors are ever retryable, and only when they were
    /// constructed via `provider_retryable` rather than `provider_parse`.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::Provider { retryable: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_retryable_category_and_flag() {
        let err = PipelineError::provider_retryable("ollama-generate", "timed out");
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_provider_parse_is_not_retryable() {
        let err = PipelineError::provider_parse("anthropic-messages", "missing content[0].text");
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_non_provider_errors_are_never_retryable() {
        assert!(!PipelineError::validation("bad input").is_retryable());
        assert!(!PipelineError::not_found("task missing").is_retryable());
        assert!(!PipelineError::conflict("illegal transition").is_retryable());
        assert!(!PipelineError::config("missing DATABASE_URL").is_retryable());
        assert!(!PipelineError::unknown("??").is_retryable());
    }

    #[test]
    fn test_display_messages_are_descriptive() {
        let err = PipelineError::conflict("cannot move completed -> in_progress without re-queue");
        let rendered = err.to_string();
        assert!(rendered.contains("conflict"));
        assert!(rendered.contains("re-queue"));
    }
}
