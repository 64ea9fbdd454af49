//! CLI interface for cv-match

use crate::config::{BackendKind, Config, FailurePolicy, OutputFormat, UnsupportedPolicy};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cvmatch")]
#[command(about = "ATS CV Checker - Compare your resume against a job description")]
#[command(long_about = "Evaluate a resume against a job description with a chat LLM, generate an ATS-optimized rewrite, and score both versions with TF-IDF cosine similarity")]
pub struct Cli {
    /// Path to your resume file (PDF or DOCX format)
    pub resume_file: PathBuf,

    /// Path to the job description text file
    pub job_description_file: PathBuf,

    /// Evaluation prompt template [default: prompts/evaluation_prompt.txt]
    #[arg(long)]
    pub eval_prompt: Option<PathBuf>,

    /// Improvement prompt template [default: prompts/improve_prompt.txt]
    #[arg(long)]
    pub improve_prompt: Option<PathBuf>,

    /// Use the built-in prompt templates instead of files
    #[arg(long, conflicts_with_all = ["eval_prompt", "improve_prompt"])]
    pub builtin_prompts: bool,

    /// Chat backend: ollama, openai
    #[arg(long)]
    pub backend: Option<String>,

    /// Backend host or base URL
    #[arg(long)]
    pub host: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Abort a chat request after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Similarity score needed to pass
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Pass when the score equals the threshold
    #[arg(long)]
    pub inclusive: bool,

    /// Stop the run when a chat request fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Reject resumes that are neither PDF nor DOCX
    #[arg(long)]
    pub strict_format: bool,

    /// Output format: console, json
    #[arg(short, long)]
    pub output: Option<String>,

    /// Also save the report to this file
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded configuration
    pub fn apply_to(&self, config: &mut Config) -> Result<(), String> {
        if let Some(path) = &self.eval_prompt {
            config.prompts.evaluation = path.clone();
        }
        if let Some(path) = &self.improve_prompt {
            config.prompts.improvement = path.clone();
        }
        if self.builtin_prompts {
            config.prompts.builtin = true;
        }

        if let Some(backend) = &self.backend {
            config.backend.kind = parse_backend(backend)?;
        }
        if let Some(host) = &self.host {
            config.backend.host = Some(host.clone());
        }
        if let Some(model) = &self.model {
            config.backend.model = Some(model.clone());
        }
        if let Some(timeout) = self.timeout {
            config.backend.timeout_secs = Some(timeout);
        }

        if let Some(threshold) = self.threshold {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(format!("Threshold must be between 0 and 100, got {}", threshold));
            }
            config.scoring.pass_threshold = threshold;
        }
        if self.inclusive {
            config.scoring.inclusive = true;
        }

        if self.fail_fast {
            config.generation.on_failure = FailurePolicy::Abort;
        }
        if self.strict_format {
            config.input.unsupported_resume = UnsupportedPolicy::Reject;
        }

        if let Some(output) = &self.output {
            config.output.format = parse_output_format(output)?;
        }
        if self.no_color {
            config.output.color_output = false;
        }

        Ok(())
    }
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Parse and validate backend name
pub fn parse_backend(backend: &str) -> Result<BackendKind, String> {
    match backend.to_lowercase().as_str() {
        "ollama" | "local" => Ok(BackendKind::Ollama),
        "openai" => Ok(BackendKind::OpenAi),
        _ => Err(format!("Invalid backend: {}. Supported: ollama, openai", backend)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["cvmatch", "cv.pdf", "job.txt"]).unwrap();
        assert_eq!(cli.resume_file, PathBuf::from("cv.pdf"));
        assert_eq!(cli.job_description_file, PathBuf::from("job.txt"));
        assert!(cli.eval_prompt.is_none());

        let mut config = Config::default();
        cli.apply_to(&mut config).unwrap();
        assert_eq!(config.prompts.evaluation, PathBuf::from("prompts/evaluation_prompt.txt"));
        assert_eq!(config.prompts.improvement, PathBuf::from("prompts/improve_prompt.txt"));
    }

    #[test]
    fn test_missing_job_description() {
        assert!(Cli::try_parse_from(["cvmatch", "cv.pdf"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "cvmatch",
            "cv.docx",
            "job.txt",
            "--eval-prompt",
            "e.txt",
            "--improve-prompt",
            "i.txt",
            "--backend",
            "openai",
            "--model",
            "gpt-4o",
            "--timeout",
            "45",
            "--threshold",
            "60",
            "--inclusive",
            "--fail-fast",
            "--strict-format",
            "--output",
            "json",
            "--no-color",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_to(&mut config).unwrap();

        assert_eq!(config.prompts.evaluation, PathBuf::from("e.txt"));
        assert_eq!(config.prompts.improvement, PathBuf::from("i.txt"));
        assert_eq!(config.backend.kind, BackendKind::OpenAi);
        assert_eq!(config.backend.model(), "gpt-4o");
        assert_eq!(config.backend.timeout_secs, Some(45));
        assert_eq!(config.scoring.pass_threshold, 60.0);
        assert!(config.scoring.inclusive);
        assert_eq!(config.generation.on_failure, FailurePolicy::Abort);
        assert_eq!(config.input.unsupported_resume, UnsupportedPolicy::Reject);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color_output);
    }

    #[test]
    fn test_builtin_conflicts_with_files() {
        let result = Cli::try_parse_from([
            "cvmatch",
            "cv.pdf",
            "job.txt",
            "--builtin-prompts",
            "--eval-prompt",
            "e.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let cli = Cli::try_parse_from(["cvmatch", "a.pdf", "b.txt", "--timeout", "0"]).unwrap();
        let mut config = Config::default();
        cli.apply_to(&mut config).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();

        let cli = Cli::try_parse_from(["cvmatch", "a.pdf", "b.txt", "--backend", "bard"]).unwrap();
        assert!(cli.apply_to(&mut config).is_err());

        let cli = Cli::try_parse_from(["cvmatch", "a.pdf", "b.txt", "--threshold", "120"]).unwrap();
        assert!(cli.apply_to(&mut config).is_err());

        assert!(parse_output_format("html").is_err());
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
    }
}
