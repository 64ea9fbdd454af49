//! cv-match library: resume vs. job description alignment

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod llm;
pub mod output;

pub use error::{Result, CvMatchError};
pub use config::Config;
