//! Pairing generated answers with benchmark entries and scoring them.

use crate::dataset::{BenchmarkEntry, GeneratedEntry};
use crate::error::Result;
use crate::rouge::RougeScorer;
use crate::semantic::SemanticScorer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score for one (benchmark, generated) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Benchmark id.
    pub id: String,
    /// Benchmark question.
    pub question: String,
    /// Expected answer (trimmed).
    pub expected: String,
    /// Generated answer (trimmed).
    pub generated: String,
    /// ROUGE-L F-measure, rounded to 4 places.
    pub rouge_score: f64,
    /// Cosine similarity, rounded to 4 places.
    pub semantic_score: f64,
    /// Whether the unrounded semantic score met the threshold.
    pub passed: bool,
    /// Threshold the answer was judged against.
    pub expected_score: f64,
}

/// Aggregate pass/fail counts for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage of passed answers, 0.0 when nothing was scored.
    pub accuracy: f64,
    pub semantic_threshold: f64,
    /// Benchmark entries with an empty answer or no generated counterpart.
    pub skipped_benchmark: usize,
    /// Generated answers that were empty.
    pub skipped_generated: usize,
}

impl Summary {
    /// Create empty summary.
    pub fn new(semantic_threshold: f64) -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            accuracy: 0.0,
            semantic_threshold,
            skipped_benchmark: 0,
            skipped_generated: 0,
        }
    }

    /// Record one scored answer.
    fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Recompute accuracy from the counts.
    fn finish(&mut self) {
        self.accuracy = if self.total > 0 {
            round_to(self.passed as f64 / self.total as f64 * 100.0, 2)
        } else {
            0.0
        };
    }

    /// True when no answer was eligible for scoring.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Results of comparing a response set against a benchmark.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub results: Vec<ComparisonResult>,
    pub summary: Summary,
}

/// Scores generated answers against benchmark answers.
pub struct Comparator<'a> {
    rouge: &'a RougeScorer,
    semantic: SemanticScorer<'a>,
    semantic_threshold: f64,
}

impl<'a> Comparator<'a> {
    pub fn new(rouge: &'a RougeScorer, semantic: SemanticScorer<'a>, semantic_threshold: f64) -> Self {
        Self {
            rouge,
            semantic,
            semantic_threshold,
        }
    }

    /// Score every generated answer whose id appears in the benchmark.
    ///
    /// Benchmark entries with an empty answer or no generated answers, and
    /// empty generated answers, produce no result and are only counted as skipped.
    pub fn compare(
        &self,
        benchmark: &[BenchmarkEntry],
        generated: &[GeneratedEntry],
    ) -> Result<Comparison> {
        let grouped = group_by_id(generated);
        let mut results = Vec::new();
        let mut summary = Summary::new(self.semantic_threshold);

        for entry in benchmark {
            let expected = entry.answer.trim();

            let answers = match grouped.get(entry.id.as_str()) {
                Some(answers) if !expected.is_empty() => answers,
                _ => {
                    tracing::debug!("Skipping benchmark entry {}: empty answer or no responses", entry.id);
                    summary.skipped_benchmark += 1;
                    continue;
                }
            };

            for answer in answers {
                let generated = answer.answer.trim();
                if generated.is_empty() {
                    tracing::debug!("Skipping empty generated answer for {}", entry.id);
                    summary.skipped_generated += 1;
                    continue;
                }

                let rouge_score = self.rouge.fmeasure(expected, generated);
                let semantic_score = self.semantic.score(expected, generated)?;
                let passed = semantic_score >= self.semantic_threshold;

                results.push(ComparisonResult {
                    id: entry.id.clone(),
                    question: entry.question.clone(),
                    expected: expected.to_string(),
                    generated: generated.to_string(),
                    rouge_score: round_to(rouge_score, 4),
                    semantic_score: round_to(semantic_score, 4),
                    passed,
                    expected_score: self.semantic_threshold,
                });
                summary.record(passed);
            }
        }

        summary.finish();

        Ok(Comparison { results, summary })
    }
}

/// Group generated entries by id, keeping input order within each id.
pub fn group_by_id(generated: &[GeneratedEntry]) -> HashMap<&str, Vec<&GeneratedEntry>> {
    let mut grouped: HashMap<&str, Vec<&GeneratedEntry>> = HashMap::new();
    for entry in generated {
        grouped.entry(entry.id.as_str()).or_default().push(entry);
    }
    grouped
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
