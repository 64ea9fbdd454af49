//! Text processing, similarity scoring, and the alignment pipeline

pub mod text_processor;
pub mod similarity;
pub mod analyzer;
