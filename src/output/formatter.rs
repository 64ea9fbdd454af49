//! Console and JSON rendering of alignment reports

use crate::config::OutputFormat;
use crate::error::{CvMatchError, Result};
use crate::output::report::AlignmentReport;
use crate::processing::similarity::SimilarityVerdict;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &AlignmentReport) -> Result<String>;
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_verdict(&self, verdict: &SimilarityVerdict) -> String {
        let marker = if verdict.passed {
            self.colorize("✅ PASS", Color::Green)
        } else {
            self.colorize("❌ FAIL", Color::Red)
        };
        format!(
            "Cosine Similarity Score ({}): {:.2},   {}\n",
            verdict.label, verdict.score, marker
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    /// Header, evaluation, improved resume, similarity section, in that order.
    fn format_report(&self, report: &AlignmentReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.colorize("*** 📄 ATS CV Checker ***", Color::Blue));
        output.push('\n');

        output.push_str(&self.colorize("**LLM Evaluation:**", Color::Cyan));
        output.push('\n');
        output.push_str(report.evaluation_text());
        output.push('\n');

        output.push_str(&self.colorize("*** Improved Resume (ATS-Optimized) ***", Color::Cyan));
        output.push('\n');
        output.push_str(report.improved_resume_text());
        output.push('\n');

        output.push_str(&self.colorize("**Similarity check:**", Color::Cyan));
        output.push('\n');
        output.push_str(&self.format_verdict(&report.original_similarity));
        output.push_str(&self.format_verdict(&report.improved_similarity));
        output.push_str("***\n");

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AlignmentReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ReportGenerator {
    pub fn with_options(use_colors: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    pub fn generate_report(&self, report: &AlignmentReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
        }
    }

    /// Write the formatted report to stdout
    pub fn print_report(&self, report: &AlignmentReport, format: &OutputFormat) -> Result<()> {
        let content = self.generate_report(report, format)?;
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        CvMatchError::OutputFormatting(format!("Failed to write report to {}: {}", file_path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;
    use crate::llm::client::ChatReply;
    use crate::output::report::{ReportMetadata, ABSENT_REPLY};
    use crate::processing::similarity::PassPolicy;

    fn verdict(label: &str, score: f64, passed: bool) -> SimilarityVerdict {
        SimilarityVerdict {
            label: label.to_string(),
            score,
            passed,
        }
    }

    fn report(evaluation: Option<ChatReply>, improved: Option<ChatReply>) -> AlignmentReport {
        AlignmentReport {
            evaluation,
            improved_resume: improved,
            original_similarity: verdict("original", 42.0, false),
            improved_similarity: verdict("improved", 71.5, true),
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now(),
                resume_file: None,
                job_file: None,
                backend: BackendKind::Ollama,
                model: "qwen2.5-coder:7b".to_string(),
                pass_policy: PassPolicy::new(70.0, false),
                processing_time_ms: 12,
            },
        }
    }

    #[test]
    fn test_console_report_order() {
        let report = report(
            Some(ChatReply::Message("Score: 64/100".to_string())),
            Some(ChatReply::Message("JANE DOE\nRust engineer".to_string())),
        );
        let output = ConsoleFormatter::new(false).format_report(&report).unwrap();

        let header = output.find("*** 📄 ATS CV Checker ***").unwrap();
        let evaluation = output.find("Score: 64/100").unwrap();
        let improved = output.find("JANE DOE").unwrap();
        let similarity = output.find("**Similarity check:**").unwrap();
        assert!(header < evaluation && evaluation < improved && improved < similarity);

        assert!(output.contains("Cosine Similarity Score (original): 42.00,   ❌ FAIL\n"));
        assert!(output.contains("Cosine Similarity Score (improved): 71.50,   ✅ PASS\n"));
        assert!(output.ends_with("***\n"));
    }

    #[test]
    fn test_absent_replies_print_placeholder() {
        let report = report(None, None);
        let output = ConsoleFormatter::new(false).format_report(&report).unwrap();

        assert_eq!(output.matches(&format!("\n{}\n", ABSENT_REPLY)).count(), 2);
        assert!(output.contains("**Similarity check:**"));
        assert!(output.contains("Cosine Similarity Score (original)"));
        assert!(output.contains("Cosine Similarity Score (improved)"));
    }

    #[test]
    fn test_raw_reply_printed_verbatim() {
        let raw = r#"{"error":"model not found"}"#;
        let report = report(Some(ChatReply::Raw(raw.to_string())), None);
        let output = ConsoleFormatter::new(false).format_report(&report).unwrap();
        assert!(output.contains(raw));
    }

    #[test]
    fn test_json_report() {
        let report = report(Some(ChatReply::Message("ok".to_string())), None);
        let output = JsonFormatter::new(false).format_report(&report).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["evaluation"]["kind"], "message");
        assert_eq!(json["evaluation"]["text"], "ok");
        assert!(json["improved_resume"].is_null());
        assert_eq!(json["improved_similarity"]["passed"], true);
        assert_eq!(json["metadata"]["backend"], "ollama");
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, true);
        let report = report(None, None);

        let console = generator.generate_report(&report, &OutputFormat::Console).unwrap();
        assert!(console.starts_with("*** 📄 ATS CV Checker ***"));

        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }

    #[test]
    fn test_save_report_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.txt");

        save_report_to_file("content", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }
}
