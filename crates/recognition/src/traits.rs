//! Capability traits the orchestrator is wired against.
//!
//! The decoder and predictor are injected, never reached through globals,
//! so test doubles and alternative backends slot in without changing the
//! request handling flow.

use anyhow::Result;
use async_trait::async_trait;

use crate::error::DecodeError;
use crate::limit::Limit;
use crate::types::{DecodedImage, FacePrediction};

/// Turns raw upload bytes into an in-memory image.
///
/// ## Design Note
/// - `Send + Sync` so a single decoder can serve concurrent requests
/// - The filename travels with the bytes and must come back on the decoded
///   image unchanged; downstream consumers rely on it for traceability
pub trait ImageDecoder: Send + Sync {
    /// Decode `bytes` into an image tagged with `filename`.
    ///
    /// Empty input is valid (a request without a file) and must produce an
    /// empty image rather than an error.
    fn decode(&self, bytes: &[u8], filename: &str) -> Result<DecodedImage, DecodeError>;
}

/// Produces face predictions for a decoded image.
///
/// The predictor owns both the ordering of its results and the application
/// of the limit; callers forward the validated limit and trust what comes
/// back without re-sorting or re-truncating.
#[async_trait]
pub trait FacePredictor: Send + Sync {
    /// Detect and identify faces in `image`, returning at most `limit`
    /// predictions when the limit is bounded.
    async fn predict(&self, image: &DecodedImage, limit: Limit) -> Result<Vec<FacePrediction>>;
}
