//! Input processing module
//! Handles resume format detection, text extraction, and input loading

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::ResumeFormat;
pub use manager::{InputManager, ResumeText};
