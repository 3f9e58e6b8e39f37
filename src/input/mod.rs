//! Input processing module
//! Handles file detection, text extraction, caching and layout inspection

pub mod file_detector;
pub mod text_extractor;
pub mod formatting;
pub mod manager;

pub use manager::{ExtractedDocument, InputManager};
