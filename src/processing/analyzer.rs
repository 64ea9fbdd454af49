//! Alignment engine: prompts, chat calls, and similarity scoring in sequence

use crate::config::{Config, FailurePolicy, GenerationConfig};
use crate::error::Result;
use crate::llm::client::{ChatClient, ChatReply};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::output::progress::Spinner;
use crate::output::report::{AlignmentReport, ReportMetadata};
use crate::processing::similarity::SimilarityScorer;
use log::{error, info, warn};
use std::time::Instant;

pub struct AlignmentEngine {
    client: ChatClient,
    scorer: SimilarityScorer,
    generation: GenerationConfig,
    show_progress: bool,
}

impl AlignmentEngine {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ChatClient::new(&config.backend)?,
            scorer: SimilarityScorer::new(&config.scoring),
            generation: config.generation.clone(),
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run evaluation, rewrite, and both similarity checks.
    ///
    /// Chat failures follow the configured `FailurePolicy`; under `Continue`
    /// the missing reply is recorded as `None` and scored as empty text.
    pub async fn analyze(
        &self,
        resume: &str,
        job: &str,
        templates: &PromptTemplates,
    ) -> Result<AlignmentReport> {
        let start = Instant::now();
        let params = PromptParams {
            resume_content: resume.to_string(),
            job_content: job.to_string(),
        };

        let evaluation_prompt = templates.evaluation.render(&params)?;
        let improvement_prompt = templates.improvement.render(&params)?;

        info!("Requesting evaluation from {} ({})", self.client.endpoint(), self.client.model());
        let evaluation = self
            .ask("Evaluation", &evaluation_prompt, self.generation.evaluation_temperature)
            .await?;

        info!("Requesting improved resume");
        let improved_resume = self
            .ask("Resume rewrite", &improvement_prompt, self.generation.improvement_temperature)
            .await?;

        let improved_text = improved_resume.as_ref().map(ChatReply::text).unwrap_or("");
        let original_similarity = self.scorer.verdict("original", resume, job);
        let improved_similarity = self.scorer.verdict("improved", improved_text, job);

        info!(
            "Similarity original {:.2}, improved {:.2}",
            original_similarity.score, improved_similarity.score
        );

        Ok(AlignmentReport {
            evaluation,
            improved_resume,
            original_similarity,
            improved_similarity,
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now(),
                resume_file: None,
                job_file: None,
                backend: self.client.kind(),
                model: self.client.model().to_string(),
                pass_policy: self.scorer.policy(),
                processing_time_ms: start.elapsed().as_millis() as u64,
            },
        })
    }

    async fn ask(&self, stage: &str, prompt: &str, temperature: f64) -> Result<Option<ChatReply>> {
        let spinner = Spinner::start(&format!("{} in progress", stage), self.show_progress);
        let outcome = self.client.complete(prompt, temperature).await;
        spinner.finish();

        match outcome {
            Ok(reply) => {
                if !reply.is_structured() {
                    warn!("{} reply had an unexpected shape, keeping the raw body", stage);
                }
                Ok(Some(reply))
            }
            Err(e) => match self.generation.on_failure {
                FailurePolicy::Continue => {
                    error!("Error connecting to chat API ({}): {}", stage.to_lowercase(), e);
                    Ok(None)
                }
                FailurePolicy::Abort => Err(e),
            },
        }
    }
}
