//! Evaluation and improvement prompt templates

use crate::error::{CvMatchError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const RESUME_PLACEHOLDER: &str = "resume";
const JOB_PLACEHOLDER: &str = "job_desc";

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

/// A named template with `{resume}` and `{job_desc}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub body: String,
}

/// The two templates a run needs
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub evaluation: PromptTemplate,
    pub improvement: PromptTemplate,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            evaluation: PromptTemplate::new("evaluation", EVALUATION_TEMPLATE),
            improvement: PromptTemplate::new("improvement", IMPROVEMENT_TEMPLATE),
        }
    }
}

impl PromptTemplates {
    pub fn from_files(evaluation: &Path, improvement: &Path) -> Result<Self> {
        Ok(Self {
            evaluation: PromptTemplate::load("evaluation", evaluation)?,
            improvement: PromptTemplate::load("improvement", improvement)?,
        })
    }
}

impl PromptTemplate {
    pub fn new(name: &str, body: &str) -> Self {
        Self {
            name: name.to_string(),
            body: body.to_string(),
        }
    }

    /// Read a template file. A missing file is reported as `TemplateNotFound`.
    pub fn load(name: &str, path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CvMatchError::TemplateNotFound(PathBuf::from(path)),
            _ => CvMatchError::Io(e),
        })?;
        debug!("Loaded {} prompt from {}", name, path.display());
        Ok(Self::new(name, &body))
    }

    /// Substitute both placeholders in one pass.
    ///
    /// `{{` and `}}` render as literal braces; any other placeholder or a
    /// stray brace is an error. Substituted text is never re-scanned.
    pub fn render(&self, params: &PromptParams) -> Result<String> {
        let mut output = String::with_capacity(
            self.body.len() + params.resume_content.len() + params.job_content.len(),
        );
        let mut seen_resume = false;
        let mut seen_job = false;
        let mut rest = self.body.as_str();

        while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
            output.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with("{{") {
                output.push('{');
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with("}}") {
                output.push('}');
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with('}') {
                return Err(self.error("single '}' encountered"));
            }

            let close = tail
                .find('}')
                .ok_or_else(|| self.error("unmatched '{'"))?;
            match &tail[1..close] {
                RESUME_PLACEHOLDER => {
                    output.push_str(&params.resume_content);
                    seen_resume = true;
                }
                JOB_PLACEHOLDER => {
                    output.push_str(&params.job_content);
                    seen_job = true;
                }
                other => {
                    return Err(self.error(&format!("unknown placeholder '{{{}}}'", other)));
                }
            }
            rest = &tail[close + 1..];
        }
        output.push_str(rest);

        if !seen_resume {
            warn!("The {} prompt has no {{{}}} placeholder", self.name, RESUME_PLACEHOLDER);
        }
        if !seen_job {
            warn!("The {} prompt has no {{{}}} placeholder", self.name, JOB_PLACEHOLDER);
        }

        Ok(output)
    }

    fn error(&self, message: &str) -> CvMatchError {
        CvMatchError::Template(format!("{} prompt: {}", self.name, message))
    }
}

const EVALUATION_TEMPLATE: &str = "Evaluate the following resume against the job description. \
Give a score out of 100, a short rationale, and improvement suggestions if any.

Resume:
{resume}

Job Description:
{job_desc}";

const IMPROVEMENT_TEMPLATE: &str = r#"
You are an expert resume coach and editor. Rewrite the following resume to be optimized for the job description below.
- Incorporate missing skills, tools, or responsibilities based on the job.
- Keep original experiences factual but improve alignment.
- Use clear, ATS-friendly formatting and job-aligned language.
- Do not invent roles or exaggerate.
Resume:
{resume}
Job Description:
{job_desc}
"#;
