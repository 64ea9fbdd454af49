//! Alignment report produced by a single run

use crate::config::BackendKind;
use crate::llm::client::ChatReply;
use crate::processing::similarity::{PassPolicy, SimilarityVerdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Printed in place of a reply the backend never delivered
pub const ABSENT_REPLY: &str = "None";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// `None` when the evaluation call failed and the run continued.
    pub evaluation: Option<ChatReply>,

    /// `None` when the improvement call failed and the run continued.
    pub improved_resume: Option<ChatReply>,

    /// Resume as extracted vs. the job description
    pub original_similarity: SimilarityVerdict,

    /// Rewritten resume vs. the job description
    pub improved_similarity: SimilarityVerdict,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resume_file: Option<String>,
    pub job_file: Option<String>,
    pub backend: BackendKind,
    pub model: String,
    pub pass_policy: PassPolicy,
    pub processing_time_ms: u64,
}

impl AlignmentReport {
    pub fn evaluation_text(&self) -> &str {
        self.evaluation.as_ref().map(ChatReply::text).unwrap_or(ABSENT_REPLY)
    }

    pub fn improved_resume_text(&self) -> &str {
        self.improved_resume.as_ref().map(ChatReply::text).unwrap_or(ABSENT_REPLY)
    }

    /// Whether both chat calls returned a structured assistant message
    pub fn fully_structured(&self) -> bool {
        [&self.evaluation, &self.improved_resume]
            .into_iter()
            .all(|reply| matches!(reply, Some(r) if r.is_structured()))
    }

    pub fn with_sources(mut self, resume_file: &str, job_file: &str) -> Self {
        self.metadata.resume_file = Some(resume_file.to_string());
        self.metadata.job_file = Some(job_file.to_string());
        self
    }
}
