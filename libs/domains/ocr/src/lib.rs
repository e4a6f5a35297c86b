//! Wine label text extraction.
//!
//! `POST /ocr` takes a multipart upload, [`OcrService`] checks the bytes are a
//! recognised image and hands them to a [`TextDetector`]. Production uses
//! [`VisionClient`] (Cloud Vision `TEXT_DETECTION`).

pub mod detector;
pub mod error;
pub mod handlers;
pub mod media;
pub mod service;
pub mod vision;

pub use detector::TextDetector;
pub use error::{OcrError, OcrResult};
pub use handlers::ApiDoc;
pub use service::{ExtractedText, OcrService};
pub use vision::{VisionClient, VisionConfig};
