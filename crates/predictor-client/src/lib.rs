//! HTTP client for a remote face-prediction service.
//!
//! This crate provides the production [`FacePredictor`] backend: it ships
//! the decoded image to an external model service and maps the JSON reply
//! back into domain predictions. It handles:
//! - Base-URL validation up front
//! - Re-encoding the image for transport
//! - Deserializing and sanity-checking the prediction payload

use std::io::Cursor;

use anyhow::Result;
use async_trait::async_trait;
use image::ImageFormat;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

use recognition::{BoundingBox, DecodedImage, FacePrediction, FacePredictor, Limit};

/// Errors that can occur when talking to the prediction service.
#[derive(Error, Debug)]
pub enum RemotePredictorError {
    #[error("Failed to reach prediction service: {0}")]
    Connection(String),

    #[error("Prediction request failed: {0}")]
    Prediction(String),

    #[error("Invalid response from prediction service: {0}")]
    InvalidResponse(String),
}

/// One prediction as serialized by the remote service.
#[derive(Debug, Deserialize)]
struct PredictionPayload {
    #[serde(rename = "box")]
    bounding_box: BoxPayload,
    prediction: String,
    probability: f64,
}

#[derive(Debug, Deserialize)]
struct BoxPayload {
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    result: Vec<PredictionPayload>,
}

impl From<PredictionPayload> for FacePrediction {
    fn from(payload: PredictionPayload) -> Self {
        FacePrediction {
            bounding_box: BoundingBox {
                xmin: payload.bounding_box.xmin,
                ymin: payload.bounding_box.ymin,
                xmax: payload.bounding_box.xmax,
                ymax: payload.bounding_box.ymax,
            },
            prediction: payload.prediction,
            probability: payload.probability,
        }
    }
}

/// Client for the face-prediction service.
///
/// Wraps a `reqwest` client and provides the higher-level predict call the
/// orchestrator is wired against.
#[derive(Debug)]
pub struct RemotePredictor {
    client: reqwest::Client,
    base_url: String,
}

impl RemotePredictor {
    /// Create a client for the service at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Root address of the prediction service
    ///   (e.g. "http://localhost:5001")
    ///
    /// The address is validated eagerly so a misconfigured deployment fails
    /// at startup instead of on the first request.
    pub fn connect(base_url: impl Into<String>) -> Result<Self, RemotePredictorError> {
        let base_url = base_url.into();
        reqwest::Url::parse(&base_url).map_err(|e| {
            RemotePredictorError::Connection(format!("Invalid service address {base_url:?}: {e}"))
        })?;
        info!("Using face prediction service at {}", base_url);
        Ok(RemotePredictor {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Request predictions for `image`, forwarding the validated limit.
    ///
    /// # Returns
    /// Predictions in the order the service returned them. The service owns
    /// ordering and truncation; the only check applied here is that a
    /// bounded limit was not exceeded.
    pub async fn predict_faces(
        &self,
        image: &DecodedImage,
        limit: Limit,
    ) -> Result<Vec<FacePrediction>, RemotePredictorError> {
        if image.is_empty() {
            debug!(
                "Empty image (filename: {:?}), skipping remote call",
                image.filename
            );
            return Ok(Vec::new());
        }

        let mut png = Vec::new();
        image
            .image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| {
                RemotePredictorError::Prediction(format!("Failed to encode image: {e}"))
            })?;

        let url = format!("{}/predict", self.base_url.trim_end_matches('/'));
        debug!(
            "Requesting predictions from {} (filename: {:?}, limit: {}, {} bytes)",
            url,
            image.filename,
            limit,
            png.len()
        );

        let response = self
            .client
            .post(&url)
            .query(&[
                ("limit", limit.get().to_string()),
                ("filename", image.filename.clone()),
            ])
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(png)
            .send()
            .await
            .map_err(|e| {
                error!("Prediction service unreachable: {}", e);
                RemotePredictorError::Connection(e.to_string())
            })?;

        let response = response.error_for_status().map_err(|e| {
            error!("Prediction service returned an error status: {}", e);
            RemotePredictorError::Prediction(e.to_string())
        })?;

        let payload: PredictResponse = response
            .json()
            .await
            .map_err(|e| RemotePredictorError::InvalidResponse(e.to_string()))?;

        if !limit.is_unlimited() && payload.result.len() > limit.get() as usize {
            error!(
                "Service returned {} predictions for a limit of {}",
                payload.result.len(),
                limit
            );
            return Err(RemotePredictorError::InvalidResponse(
                "More predictions returned than the requested limit".into(),
            ));
        }

        Ok(payload.result.into_iter().map(FacePrediction::from).collect())
    }

    /// The base address of the service this client talks to.
    pub fn service_address(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl FacePredictor for RemotePredictor {
    async fn predict(&self, image: &DecodedImage, limit: Limit) -> Result<Vec<FacePrediction>> {
        Ok(self.predict_faces(image, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn test_image(width: u32, height: u32, filename: &str) -> DecodedImage {
        DecodedImage {
            image: DynamicImage::new_rgb8(width, height),
            filename: filename.to_string(),
        }
    }

    fn find_blank_line(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }

    /// Read one full HTTP request (headers + Content-Length body) off the
    /// stream so the client sees a well-behaved peer.
    async fn read_request(stream: &mut TcpStream) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.expect("Read failed");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find_blank_line(&buf) {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                let total = pos + 4 + content_length;
                while buf.len() < total {
                    let n = stream.read(&mut chunk).await.expect("Read failed");
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                return buf;
            }
            if n == 0 {
                return buf;
            }
        }
    }

    /// Start a one-shot prediction service that answers every request with
    /// the given body and hands back the raw request it received.
    async fn start_canned_service(
        status: &'static str,
        body: String,
    ) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind canned service");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("Accept failed");
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("Write failed");
            stream.shutdown().await.ok();
            request
        });

        (format!("http://{}", addr), handle)
    }

    fn two_prediction_body() -> String {
        serde_json::json!({
            "result": [
                {
                    "box": {"xmin": 60, "ymin": 80, "xmax": 50, "ymax": 70},
                    "prediction": "Joe Bloggs",
                    "probability": 0.9
                },
                {
                    "box": {"xmin": 20, "ymin": 40, "xmax": 10, "ymax": 30},
                    "prediction": "Fred Bloggs",
                    "probability": 0.85
                }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_predict_maps_service_payload_to_domain() {
        let (addr, handle) = start_canned_service("200 OK", two_prediction_body()).await;
        let predictor = RemotePredictor::connect(addr).expect("Connect failed");

        let predictions = predictor
            .predict_faces(&test_image(2, 2, "group-photo.jpg"), Limit::from_count(2))
            .await
            .expect("Predict failed");

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].prediction, "Joe Bloggs");
        assert_eq!(predictions[0].probability, 0.9);
        assert_eq!(
            predictions[0].bounding_box,
            BoundingBox {
                xmin: 60,
                ymin: 80,
                xmax: 50,
                ymax: 70
            }
        );
        assert_eq!(predictions[1].prediction, "Fred Bloggs");

        let request = handle.await.expect("Service task panicked");
        let head = String::from_utf8_lossy(&request);
        assert!(head.starts_with("POST /predict"), "Request was: {head}");
        assert!(head.contains("limit=2"), "Request was: {head}");
        assert!(head.contains("group-photo.jpg"), "Request was: {head}");
    }

    #[tokio::test]
    async fn test_over_limit_response_is_rejected() {
        let (addr, handle) = start_canned_service("200 OK", two_prediction_body()).await;
        let predictor = RemotePredictor::connect(addr).expect("Connect failed");

        let err = predictor
            .predict_faces(&test_image(2, 2, "photo.png"), Limit::from_count(1))
            .await
            .unwrap_err();

        assert!(matches!(err, RemotePredictorError::InvalidResponse(_)));
        handle.await.expect("Service task panicked");
    }

    #[tokio::test]
    async fn test_error_status_is_a_prediction_error() {
        let (addr, handle) =
            start_canned_service("500 Internal Server Error", "{}".to_string()).await;
        let predictor = RemotePredictor::connect(addr).expect("Connect failed");

        let err = predictor
            .predict_faces(&test_image(2, 2, "photo.png"), Limit::UNLIMITED)
            .await
            .unwrap_err();

        assert!(matches!(err, RemotePredictorError::Prediction(_)));
        handle.await.expect("Service task panicked");
    }

    #[tokio::test]
    async fn test_empty_image_short_circuits_without_a_request() {
        // Port 9 is the discard port; nothing listens there in tests. The
        // call must succeed anyway because no request is made.
        let predictor = RemotePredictor::connect("http://127.0.0.1:9").expect("Connect failed");

        let predictions = predictor
            .predict_faces(&test_image(0, 0, ""), Limit::UNLIMITED)
            .await
            .expect("Empty image must yield no predictions");

        assert!(predictions.is_empty());
    }

    #[test]
    fn test_connect_rejects_malformed_addresses() {
        let err = RemotePredictor::connect("not a url").unwrap_err();
        assert!(matches!(err, RemotePredictorError::Connection(_)));
    }
}
