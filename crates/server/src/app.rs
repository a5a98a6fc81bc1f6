//! HTTP layer: router, the `/recognize` handler, and error mapping.
//!
//! The wire contract lives here:
//! - `POST /recognize` with an optional multipart `file` field and an
//!   optional `limit` query parameter
//! - `200` with `{"result": [...]}` on success
//! - `400` with `{"message": ...}` when the limit fails validation, before
//!   any decode or predict work happens
//! - `500` with `{"message": "Internal server error"}` when a collaborator
//!   fails; the cause is logged, never masked as an empty success

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use recognition::{BoundingBox, FacePrediction, Limit, LimitError};

use crate::orchestrator::{RecognitionOrchestrator, Upload};

/// Default cap on the request body; uploads beyond this are rejected by the
/// framework before the handler runs.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024; // 100MB

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<RecognitionOrchestrator>,
}

/// Build the application router around an orchestrator.
pub fn create_app(orchestrator: RecognitionOrchestrator, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/recognize", post(recognize))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(AppState {
            orchestrator: Arc::new(orchestrator),
        })
}

#[derive(Debug, Deserialize)]
struct RecognizeParams {
    limit: Option<String>,
}

/// Top-level success payload: `{"result": [...]}`.
#[derive(Debug, Serialize)]
pub struct RecognizeResponse {
    pub result: Vec<FacePredictionDto>,
}

/// One prediction as serialized on the wire. Key names are part of the
/// contract and must not drift from the domain model's meaning.
#[derive(Debug, Serialize)]
pub struct FacePredictionDto {
    #[serde(rename = "box")]
    pub bounding_box: BoundingBoxDto,
    pub prediction: String,
    pub probability: f64,
}

#[derive(Debug, Serialize)]
pub struct BoundingBoxDto {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl From<FacePrediction> for FacePredictionDto {
    fn from(prediction: FacePrediction) -> Self {
        FacePredictionDto {
            bounding_box: BoundingBoxDto::from(prediction.bounding_box),
            prediction: prediction.prediction,
            probability: prediction.probability,
        }
    }
}

impl From<BoundingBox> for BoundingBoxDto {
    fn from(bounding_box: BoundingBox) -> Self {
        BoundingBoxDto {
            xmin: bounding_box.xmin,
            ymin: bounding_box.ymin,
            xmax: bounding_box.xmax,
            ymax: bounding_box.ymax,
        }
    }
}

/// Request failures, mapped onto HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The client sent something invalid; the message goes back verbatim.
    BadRequest(String),
    /// A collaborator (decoder, predictor) failed. Logged server-side,
    /// reported to the client as a generic internal error.
    Internal(anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl From<LimitError> for ApiError {
    fn from(err: LimitError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { message })).into_response()
            }
            ApiError::Internal(err) => {
                error!("Request failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        message: "Internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// `POST /recognize`
///
/// Validation runs first: a bad limit means neither the decoder nor the
/// predictor is ever touched.
async fn recognize(
    State(state): State<AppState>,
    Query(params): Query<RecognizeParams>,
    multipart: Option<Multipart>,
) -> Result<Json<RecognizeResponse>, ApiError> {
    let limit = Limit::parse(params.limit.as_deref())?;
    let upload = extract_upload(multipart).await?;

    let predictions = state.orchestrator.recognize(upload, limit).await?;

    Ok(Json(RecognizeResponse {
        result: predictions.into_iter().map(FacePredictionDto::from).collect(),
    }))
}

/// Pull the `file` field out of the multipart body, if both exist.
///
/// A request without a multipart body, or with a body that has no `file`
/// field, is valid and maps to `None`.
async fn extract_upload(multipart: Option<Multipart>) -> Result<Option<Upload>, ApiError> {
    let Some(mut multipart) = multipart else {
        return Ok(None);
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
        return Ok(Some(Upload {
            bytes: bytes.to_vec(),
            filename,
        }));
    }

    Ok(None)
}
