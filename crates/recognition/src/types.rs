//! Data model for face predictions.
//!
//! These types are produced by a `FacePredictor` backend and only read and
//! forwarded by the rest of the service. They live for one request and are
//! dropped once the response has been serialized.

use image::DynamicImage;

/// Pixel-space rectangle locating a detected face in the source image.
///
/// Coordinates are passed through from the predictor as-is; no ordering
/// between `xmin`/`xmax` (or `ymin`/`ymax`) is enforced at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

/// One detected face: where it is, who it is, and how confident the
/// predictor is about the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct FacePrediction {
    /// Location of the face in source-image pixel space.
    pub bounding_box: BoundingBox,
    /// Identity label assigned by the predictor.
    pub prediction: String,
    /// Confidence in the identity label, in `[0, 1]`.
    pub probability: f64,
}

/// An uploaded image decoded into memory, tagged with the filename it was
/// uploaded under.
///
/// The filename is preserved verbatim for downstream traceability; nothing
/// in the core interprets it.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub filename: String,
}

impl DecodedImage {
    /// True when the image carries no pixels (e.g. the request had no file
    /// attached). Predictor backends treat this as "no faces".
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}
