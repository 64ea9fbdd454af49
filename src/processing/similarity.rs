//! TF-IDF cosine similarity between a resume and a job description

use crate::config::ScoringConfig;
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Threshold comparison applied to a similarity percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassPolicy {
    pub threshold: f64,
    pub inclusive: bool,
}

impl PassPolicy {
    pub fn new(threshold: f64, inclusive: bool) -> Self {
        Self { threshold, inclusive }
    }

    pub fn passes(&self, score: f64) -> bool {
        if self.inclusive {
            score >= self.threshold
        } else {
            score > self.threshold
        }
    }
}

impl From<&ScoringConfig> for PassPolicy {
    fn from(config: &ScoringConfig) -> Self {
        Self::new(config.pass_threshold, config.inclusive)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityVerdict {
    pub label: String,
    pub score: f64,
    pub passed: bool,
}

pub struct SimilarityScorer {
    processor: TextProcessor,
    policy: PassPolicy,
}

impl SimilarityScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            processor: TextProcessor::new(),
            policy: PassPolicy::from(config),
        }
    }

    pub fn policy(&self) -> PassPolicy {
        self.policy
    }

    /// Similarity percentage in `[0, 100]`.
    ///
    /// Vocabulary and IDF weights come from these two documents only.
    pub fn similarity(&self, first: &str, second: &str) -> f64 {
        let first_counts = self.processor.term_counts(first);
        let second_counts = self.processor.term_counts(second);

        if first_counts.is_empty() || second_counts.is_empty() {
            return 0.0;
        }

        let first_vector = Self::weighted_vector(&first_counts, &second_counts);
        let second_vector = Self::weighted_vector(&second_counts, &first_counts);

        let first_norm = Self::norm(&first_vector);
        let second_norm = Self::norm(&second_vector);
        if first_norm == 0.0 || second_norm == 0.0 {
            return 0.0;
        }

        let dot: f64 = first_vector
            .iter()
            .filter_map(|(term, weight)| second_vector.get(term).map(|other| weight * other))
            .sum();

        (dot / (first_norm * second_norm) * 100.0).clamp(0.0, 100.0)
    }

    pub fn verdict(&self, label: &str, first: &str, second: &str) -> SimilarityVerdict {
        let score = self.similarity(first, second);
        SimilarityVerdict {
            label: label.to_string(),
            score,
            passed: self.policy.passes(score),
        }
    }

    /// Term frequency times smoothed IDF over a two-document corpus
    fn weighted_vector<'a>(
        counts: &'a BTreeMap<String, usize>,
        other: &BTreeMap<String, usize>,
    ) -> BTreeMap<&'a str, f64> {
        const DOCUMENTS: f64 = 2.0;

        counts
            .iter()
            .map(|(term, &count)| {
                let document_frequency = if other.contains_key(term) { 2.0 } else { 1.0 };
                let idf = ((1.0 + DOCUMENTS) / (1.0 + document_frequency)).ln() + 1.0;
                (term.as_str(), count as f64 * idf)
            })
            .collect()
    }

    fn norm(vector: &BTreeMap<&str, f64>) -> f64 {
        vector.values().map(|w| w * w).sum::<f64>().sqrt()
    }
}
