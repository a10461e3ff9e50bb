//! Rejection types for the upload pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use wish_core::CorrelationId;

/// Why an upload was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RejectReason {
    /// The file name contains `..`, a path separator, or is empty.
    InvalidPath,
    /// The declared content type is not allow-listed.
    InvalidType,
    /// The payload exceeds the configured maximum size.
    TooLarge,
    /// The payload does not start with the signature of its declared type.
    ContentMismatch,
}

impl RejectReason {
    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPath => "invalid_path",
            Self::InvalidType => "invalid_type",
            Self::TooLarge => "too_large",
            Self::ContentMismatch => "content_mismatch",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A refused upload, tagged with a fresh correlation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("upload rejected ({reason}), correlation id {correlation_id}")]
#[non_exhaustive]
pub struct UploadRejection {
    pub reason: RejectReason,
    pub correlation_id: CorrelationId,
}

impl UploadRejection {
    /// Create a rejection with a newly generated correlation id.
    #[must_use]
    pub fn new(reason: RejectReason) -> Self {
        Self { reason, correlation_id: CorrelationId::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rejection_gets_its_own_correlation_id() {
        let a = UploadRejection::new(RejectReason::TooLarge);
        let b = UploadRejection::new(RejectReason::TooLarge);
        assert_ne!(a.correlation_id, b.correlation_id);
    }

    #[test]
    fn rejection_display_includes_reason_and_id() {
        let r = UploadRejection::new(RejectReason::InvalidPath);
        let msg = r.to_string();
        assert!(msg.contains("invalid_path"), "got {msg}");
        assert!(msg.contains(&r.correlation_id.to_string()), "got {msg}");
    }

    #[test]
    fn reason_serializes_snake_case() {
        let json = match serde_json::to_string(&RejectReason::ContentMismatch) {
            Ok(s) => s,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json, "\"content_mismatch\"");
    }
}
