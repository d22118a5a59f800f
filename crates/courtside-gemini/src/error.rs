//! Gemini client error types.

use thiserror::Error;

pub type GeminiResult<T> = Result<T, GeminiError>;

/// Substrings that mark a quota or rate-limit rejection in error text.
const QUOTA_MARKERS: [&str; 5] = ["quota", "rate limit", "rate-limit", "resource_exhausted", "429"];

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read video: {0}")]
    Io(#[from] std::io::Error),

    #[error("Gemini API request failed: {0}")]
    Request(String),

    #[error("Gemini API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse Gemini response: {0}")]
    InvalidResponse(String),

    #[error("No content in Gemini response")]
    EmptyResponse,
}

impl GeminiError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Check if the API rejected the call for quota or rate-limit reasons.
    pub fn is_quota_exceeded(&self) -> bool {
        if let GeminiError::Status { status: 429, .. } = self {
            return true;
        }
        if matches!(self, GeminiError::Config(_) | GeminiError::Io(_)) {
            return false;
        }

        let msg = self.to_string().to_lowercase();
        QUOTA_MARKERS.iter().any(|marker| msg.contains(marker))
    }

    /// Check if the API could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, GeminiError::Request(_))
    }

    /// Transport failures degrade to example feedback instead of blocking the user.
    pub fn is_transport(&self) -> bool {
        self.is_quota_exceeded() || self.is_unreachable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_classification() {
        let err = GeminiError::Status {
            status: 429,
            body: String::new(),
        };
        assert!(err.is_quota_exceeded());

        let err = GeminiError::Status {
            status: 403,
            body: "{\"error\":{\"status\":\"RESOURCE_EXHAUSTED\"}}".to_string(),
        };
        assert!(err.is_quota_exceeded());

        let err = GeminiError::request("Rate limit exceeded, retry later");
        assert!(err.is_quota_exceeded());
        assert!(err.is_transport());
    }

    #[test]
    fn test_non_transport_errors() {
        let err = GeminiError::Status {
            status: 400,
            body: "API key not valid".to_string(),
        };
        assert!(!err.is_quota_exceeded());
        assert!(!err.is_transport());

        assert!(!GeminiError::config("GEMINI_API_KEY not set").is_transport());
        assert!(!GeminiError::EmptyResponse.is_transport());
    }

    #[test]
    fn test_unreachable_is_transport() {
        let err = GeminiError::request("error sending request: connection refused");
        assert!(err.is_unreachable());
        assert!(!err.is_quota_exceeded());
        assert!(err.is_transport());
    }
}
