//! Core domain types and capability seams for the face recognition service.
//!
//! This crate defines:
//! - The prediction data model (`BoundingBox`, `FacePrediction`)
//! - The validated result-count `Limit` and its parser
//! - The `ImageDecoder` and `FacePredictor` traits that the orchestrator
//!   is wired against, so backends can be swapped without touching the
//!   request handling flow
//! - The production in-memory image decoder

pub mod decoder;
pub mod error;
pub mod limit;
pub mod traits;
pub mod types;

pub use decoder::InMemoryDecoder;
pub use error::{DecodeError, LimitError};
pub use limit::Limit;
pub use traits::{FacePredictor, ImageDecoder};
pub use types::{BoundingBox, DecodedImage, FacePrediction};
