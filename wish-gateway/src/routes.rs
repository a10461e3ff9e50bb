//! Axum route handlers for the wishlist API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use wish_core::{Wish, WishId, WishInput, WishQueryParams};
use wish_upload::{RejectReason, UploadRejection};

use crate::{error::GatewayError, state::AppState};

// ── Response types ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// Body returned for an accepted upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Storage-safe name, random token joined to the original name.
    pub filename: String,
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub struct SecretInfo {
    pub message: &'static str,
    pub secret_length: usize,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Headroom above the file ceiling for multipart framing and small fields.
pub const UPLOAD_BODY_SLACK: usize = 64 * 1024;

/// Build the application router over the given state.
///
/// The whole upload body is capped at the pipeline's file ceiling plus
/// [`UPLOAD_BODY_SLACK`], so non-file parts cannot be streamed without
/// bound. The pipeline still enforces the exact file size.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = usize::try_from(state.pipeline.config().max_size)
        .unwrap_or(usize::MAX)
        .saturating_add(UPLOAD_BODY_SLACK);
    Router::new()
        .route("/wishes", get(list_wishes).post(create_wish))
        .route("/wishes/", get(list_wishes).post(create_wish))
        .route("/wishes/upload", post(upload_file).layer(DefaultBodyLimit::max(upload_limit)))
        .route("/wishes/{id}", get(get_wish).put(update_wish).delete(delete_wish))
        .route("/health", get(health))
        .route("/secret-info", get(secret_info))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health`: Liveness check.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// `GET /secret-info`: Reports the configured secret's length, never its value.
pub async fn secret_info(State(state): State<AppState>) -> Json<SecretInfo> {
    Json(SecretInfo { message: "Secret loaded safely", secret_length: state.secret_length })
}

/// `POST /wishes`: Validate and store a new wish.
///
/// # Errors
/// Returns [`GatewayError::Validation`] if the body is malformed or breaks a
/// field constraint.
pub async fn create_wish(
    State(state): State<AppState>,
    body: Result<Json<WishInput>, JsonRejection>,
) -> Result<Json<Wish>, GatewayError> {
    let Json(input) = body?;
    let wish = state.store.create(input.validate()?);
    info!(wish_id = %wish.id, "wish created");
    Ok(Json(wish))
}

/// `GET /wishes`: List wishes, optionally filtered and sorted.
///
/// # Errors
/// Returns [`GatewayError::Validation`] for a non-positive `max_price` or an
/// unknown `sort_by`.
pub async fn list_wishes(
    State(state): State<AppState>,
    params: Result<Query<WishQueryParams>, QueryRejection>,
) -> Result<Json<Vec<Wish>>, GatewayError> {
    let Query(params) = params?;
    let query = params.validate()?;
    Ok(Json(state.store.list(&query)))
}

/// `GET /wishes/{id}`: Fetch a single wish.
///
/// # Errors
/// Returns [`GatewayError::Store`] if the id is unknown.
pub async fn get_wish(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Wish>, GatewayError> {
    let Path(id) = id?;
    Ok(Json(state.store.get(WishId::new(id))?))
}

/// `PUT /wishes/{id}`: Replace every field of a wish except its id.
///
/// # Errors
/// Returns [`GatewayError::Store`] if the id is unknown, or
/// [`GatewayError::Validation`] if the body is invalid. Validation runs first.
pub async fn update_wish(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<WishInput>, JsonRejection>,
) -> Result<Json<Wish>, GatewayError> {
    let Path(id) = id?;
    let Json(input) = body?;
    let wish = state.store.update(WishId::new(id), input.validate()?)?;
    info!(wish_id = %wish.id, "wish updated");
    Ok(Json(wish))
}

/// `DELETE /wishes/{id}`: Remove a wish.
///
/// # Errors
/// Returns [`GatewayError::Store`] if the id is unknown or already deleted.
pub async fn delete_wish(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<DeleteResponse>, GatewayError> {
    let Path(id) = id?;
    let id = WishId::new(id);
    state.store.delete(id)?;
    info!(wish_id = %id, "wish deleted");
    Ok(Json(DeleteResponse { message: "Wish deleted" }))
}

/// `POST /wishes/upload`: Validate the multipart field `file`.
///
/// Name and type are checked from the part headers before any payload byte
/// is read; the payload is then streamed chunk by chunk into the size-bounded
/// pipeline.
///
/// # Errors
/// Returns [`GatewayError::Upload`] when the pipeline rejects the file or the
/// whole body exceeds the route limit, or [`GatewayError::BadRequest`] if the
/// multipart body is malformed or has no `file` field.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, GatewayError> {
    let mut multipart = multipart.map_err(|e| GatewayError::BadRequest(e.body_text()))?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, "", "failed to parse multipart data"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();

        let mut pending = state
            .pipeline
            .begin(&file_name, &content_type)
            .inspect_err(|r| log_rejection(r, &file_name))?;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(&e, &file_name, "failed to read file chunk"))?
        {
            pending.push(&chunk).inspect_err(|r| log_rejection(r, &file_name))?;
        }

        let accepted = pending.finish().inspect_err(|r| log_rejection(r, &file_name))?;
        info!(stored_name = %accepted.stored_name, size = accepted.size, "upload accepted");
        return Ok(Json(UploadResponse { filename: accepted.stored_name, size: accepted.size }));
    }

    Err(GatewayError::BadRequest("multipart field 'file' is missing".to_owned()))
}

/// Map a multipart read failure, turning a body over the route limit into
/// the same `too_large` rejection the pipeline reports.
fn multipart_error(error: &MultipartError, file_name: &str, context: &str) -> GatewayError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let rejection = UploadRejection::new(RejectReason::TooLarge);
        log_rejection(&rejection, file_name);
        return GatewayError::Upload(rejection);
    }
    GatewayError::BadRequest(format!("{context}: {error}"))
}

fn log_rejection(rejection: &UploadRejection, file_name: &str) {
    warn!(
        correlation_id = %rejection.correlation_id,
        reason = %rejection.reason,
        file_name = %file_name,
        "upload rejected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use wish_store::WishStore;
    use wish_upload::UploadPipeline;

    fn test_state() -> AppState {
        AppState::new(Arc::new(WishStore::new()), Arc::new(UploadPipeline::default()), 32)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = match Request::builder().uri(uri).body(Body::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let resp = match app.oneshot(req).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        let status = resp.status();
        let bytes = match axum::body::to_bytes(resp.into_body(), 1024).await {
            Ok(b) => b,
            Err(e) => panic!("failed to read body: {e}"),
        };
        let body = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        };
        (status, body)
    }

    #[tokio::test]
    async fn health_response_format_returns_ok_with_status_field() {
        let (status, body) = get_json(create_router(test_state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn secret_info_reports_length_only() {
        let (status, body) = get_json(create_router(test_state()), "/secret-info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["secret_length"], 32);
        assert_eq!(body["message"], "Secret loaded safely");
    }

    #[tokio::test]
    async fn get_unknown_wish_returns_not_found() {
        let (status, body) = get_json(create_router(test_state()), "/wishes/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_error() {
        let (status, body) = get_json(create_router(test_state()), "/wishes/abc").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["fields"][0]["field"], "id");
    }

    #[tokio::test]
    async fn unknown_sort_key_is_a_validation_error() {
        let (status, body) = get_json(create_router(test_state()), "/wishes?sort_by=color").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["fields"][0]["field"], "sort_by");
    }

    #[test]
    fn upload_response_serialization_includes_all_fields() {
        let resp = UploadResponse { filename: "abc_test.png".to_owned(), size: 1003 };
        let json = match serde_json::to_string(&resp) {
            Ok(s) => s,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert!(json.contains("\"filename\":\"abc_test.png\""), "missing filename field");
        assert!(json.contains("\"size\":1003"), "missing size field");
    }
}
