//! Report structures, formatting, and console progress

pub mod formatter;
pub mod progress;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{AlignmentReport, ReportMetadata};
