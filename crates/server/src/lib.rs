//! Server crate for the face recognition service.
//!
//! This crate contains the orchestrator that drives one recognition request
//! end to end, and the HTTP layer that exposes it as `POST /recognize`.

pub mod app;
pub mod orchestrator;

pub use app::create_app;
pub use orchestrator::{RecognitionOrchestrator, Upload};
