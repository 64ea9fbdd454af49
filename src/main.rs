//! cvmatch: ATS CV checker backed by a chat LLM

use clap::Parser;
use cv_match::cli::Cli;
use cv_match::config::Config;
use cv_match::error::Result;
use cv_match::input::InputManager;
use cv_match::llm::PromptTemplates;
use cv_match::output::formatter::{save_report_to_file, ReportGenerator};
use cv_match::processing::analyzer::AlignmentEngine;
use log::{error, info};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = cli.apply_to(&mut config) {
        error!("{}", e);
        process::exit(1);
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    // Templates first: a missing prompt file ends the run before any extraction or network call.
    let templates = if config.prompts.builtin {
        PromptTemplates::default()
    } else {
        PromptTemplates::from_files(&config.prompts.evaluation, &config.prompts.improvement)?
    };

    let input = InputManager::new();
    let resume = input
        .extract_resume(&cli.resume_file)
        .await?
        .into_text(config.input.unsupported_resume)?;
    let job = input.read_job_description(&cli.job_description_file).await?;

    info!(
        "Resume: {} characters, job description: {} characters",
        resume.chars().count(),
        job.chars().count()
    );

    let engine = AlignmentEngine::new(config)?.with_progress(true);
    let report = engine
        .analyze(&resume, &job, &templates)
        .await?
        .with_sources(
            &cli.resume_file.display().to_string(),
            &cli.job_description_file.display().to_string(),
        );

    let generator = ReportGenerator::with_options(config.output.color_output, true);
    generator.print_report(&report, &config.output.format)?;

    if let Some(path) = &cli.save {
        let plain = ReportGenerator::with_options(false, true);
        let content = plain.generate_report(&report, &config.output.format)?;
        save_report_to_file(&content, path)?;
        info!("Report saved to {}", path.display());
    }

    if report.evaluation.is_none() || report.improved_resume.is_none() {
        info!("Completed with missing chat replies; see the errors above");
    }

    Ok(())
}

