//! # Recognition Orchestrator
//!
//! This module coordinates one recognition request:
//! 1. Decode the upload (or the absence of one) into an in-memory image
//! 2. Call the face predictor with the decoded image and validated limit
//! 3. Hand the predictions back, order untouched
//!
//! The decoder and predictor are injected at construction, so the flow is
//! identical whether it runs against the production backends or the test
//! doubles.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use recognition::{DecodedImage, FacePrediction, FacePredictor, ImageDecoder, Limit};

/// One uploaded file, exactly as received: raw bytes plus the filename the
/// client sent.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Drives the decode + predict flow for a single request.
#[derive(Clone)]
pub struct RecognitionOrchestrator {
    decoder: Arc<dyn ImageDecoder>,
    predictor: Arc<dyn FacePredictor>,
}

impl RecognitionOrchestrator {
    /// Create an orchestrator wired to the given backends.
    ///
    /// # Arguments
    /// * `decoder` - Turns upload bytes into an image
    /// * `predictor` - Produces face predictions for a decoded image
    pub fn new(decoder: Arc<dyn ImageDecoder>, predictor: Arc<dyn FacePredictor>) -> Self {
        RecognitionOrchestrator { decoder, predictor }
    }

    /// Main entry point: recognize faces in an optional upload.
    ///
    /// # Arguments
    /// * `upload` - The uploaded file, or `None` when the request carried no
    ///   file (still a valid request; it yields no predictions)
    /// * `limit` - The validated result-count limit, forwarded to the
    ///   predictor untouched
    ///
    /// # Returns
    /// Predictions exactly as the predictor returned them. Ordering and
    /// truncation belong to the predictor; nothing is re-sorted or
    /// re-truncated here.
    pub async fn recognize(
        &self,
        upload: Option<Upload>,
        limit: Limit,
    ) -> Result<Vec<FacePrediction>> {
        let start_time = Instant::now();

        let (bytes, filename) = match upload {
            Some(upload) => (upload.bytes, upload.filename),
            None => (Vec::new(), String::new()),
        };

        let image = self.decode_upload(bytes, filename).await?;
        info!(
            "Decoded upload {:?} ({}x{})",
            image.filename,
            image.image.width(),
            image.image.height()
        );

        let predictions = self
            .predictor
            .predict(&image, limit)
            .await
            .context("Face prediction failed")?;
        info!(
            "Predictor returned {} predictions (limit: {})",
            predictions.len(),
            limit
        );

        let elapsed = start_time.elapsed();
        info!(
            "Recognized {:?} in {:.2?}",
            image.filename, elapsed
        );
        Ok(predictions)
    }

    /// Decode on the blocking pool; image decoding is CPU-bound.
    async fn decode_upload(&self, bytes: Vec<u8>, filename: String) -> Result<DecodedImage> {
        let decoder = self.decoder.clone();
        let image = tokio::task::spawn_blocking(move || decoder.decode(&bytes, &filename))
            .await
            .context("Decoder task panicked")?
            .context("Failed to decode uploaded image")?;
        Ok(image)
    }
}
