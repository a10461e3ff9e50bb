//! Error types for the gateway crate.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use wish_core::{CoreError, CorrelationId, FieldViolation};
use wish_store::StoreError;
use wish_upload::{AllowedType, RejectReason, UploadRejection};

/// Errors that can occur during gateway request handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// Wish input or list query broke a field constraint.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// An error propagated from the wish store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The upload pipeline refused the file.
    #[error(transparent)]
    Upload(#[from] UploadRejection),

    /// The request could not be interpreted at all.
    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(CoreError::invalid("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(CoreError::invalid("query", rejection.body_text()))
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(CoreError::invalid("id", rejection.body_text()))
    }
}

/// Problem-details body returned for rejected uploads.
#[derive(Debug, Serialize)]
pub struct UploadProblem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    pub correlation_id: CorrelationId,
}

impl UploadProblem {
    fn from_rejection(rejection: &UploadRejection) -> (StatusCode, Self) {
        let (status, slug, title, detail) = match rejection.reason {
            RejectReason::InvalidPath => (
                StatusCode::BAD_REQUEST,
                "invalid-path",
                "Invalid file path",
                "File names must not contain path separators or '..' segments".to_owned(),
            ),
            RejectReason::InvalidType => (
                StatusCode::BAD_REQUEST,
                "invalid-type",
                "Invalid file type",
                format!(
                    "Allowed content types: {}",
                    AllowedType::ALL.map(AllowedType::mime).join(", ")
                ),
            ),
            RejectReason::TooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "file-too-large",
                "File too large",
                "The uploaded file exceeds the allowed size".to_owned(),
            ),
            RejectReason::ContentMismatch => (
                StatusCode::BAD_REQUEST,
                "content-mismatch",
                "File content does not match declared type",
                "The leading bytes of the file do not match its declared content type".to_owned(),
            ),
            _ => (
                StatusCode::BAD_REQUEST,
                "upload-rejected",
                "Upload rejected",
                format!("The upload was rejected: {}", rejection.reason),
            ),
        };
        let problem = Self {
            kind: format!("https://example.com/probs/{slug}"),
            title,
            status: status.as_u16(),
            detail,
            correlation_id: rejection.correlation_id,
        };
        (status, problem)
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "no_fields")]
    fields: &'a [FieldViolation],
}

fn no_fields(fields: &&[FieldViolation]) -> bool {
    fields.is_empty()
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, fields) = match &self {
            GatewayError::Upload(rejection) => {
                let (status, problem) = UploadProblem::from_rejection(rejection);
                return (status, Json(problem)).into_response();
            }
            GatewayError::Validation(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", err.violations())
            }
            GatewayError::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "not_found", &[][..])
            }
            GatewayError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", &[][..])
            }
            GatewayError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", &[][..]),
        };
        let error = ErrorBody { code, message: self.to_string(), fields };
        (status, Json(ErrorEnvelope { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wish_core::WishId;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = match axum::body::to_bytes(resp.into_body(), 64 * 1024).await {
            Ok(b) => b,
            Err(e) => panic!("failed to read body: {e}"),
        };
        match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        }
    }

    #[test]
    fn gateway_error_status_codes_map_correctly() {
        let not_found = GatewayError::Store(StoreError::NotFound(WishId::new(9)));
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid = GatewayError::Validation(CoreError::invalid("title", "must not be empty"));
        assert_eq!(invalid.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bad_req = GatewayError::BadRequest("missing file".to_owned());
        assert_eq!(bad_req.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upload_rejections_map_to_400_or_413() {
        for (reason, expected) in [
            (RejectReason::InvalidPath, StatusCode::BAD_REQUEST),
            (RejectReason::InvalidType, StatusCode::BAD_REQUEST),
            (RejectReason::TooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (RejectReason::ContentMismatch, StatusCode::BAD_REQUEST),
        ] {
            let resp = GatewayError::Upload(UploadRejection::new(reason)).into_response();
            assert_eq!(resp.status(), expected, "reason {reason}");
        }
    }

    #[tokio::test]
    async fn validation_body_lists_fields() {
        let err = GatewayError::Validation(CoreError::invalid("title", "must not be empty"));
        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["fields"][0]["field"], "title");
        assert!(body["error"]["message"].as_str().is_some_and(|m| m.contains("must not be empty")));
    }

    #[tokio::test]
    async fn not_found_body_omits_fields() {
        let err = GatewayError::Store(StoreError::NotFound(WishId::new(999)));
        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"]["code"], "not_found");
        assert_eq!(body["error"]["message"], "wish 999 not found");
        assert!(body["error"].get("fields").is_none());
    }

    #[tokio::test]
    async fn upload_problem_carries_correlation_id() {
        let rejection = UploadRejection::new(RejectReason::TooLarge);
        let body = body_json(GatewayError::Upload(rejection).into_response()).await;
        assert_eq!(body["type"], "https://example.com/probs/file-too-large");
        assert_eq!(body["title"], "File too large");
        assert_eq!(body["status"], 413);
        assert_eq!(body["correlation_id"], rejection.correlation_id.to_string());
    }
}
