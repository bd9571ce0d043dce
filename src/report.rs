//! Console summary and JSON report output.

use crate::comparator::{ComparisonResult, Summary};
use crate::error::{Result, ValidatorError};
use std::cmp::Ordering;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Default number of lowest-scoring answers shown in the summary.
pub const DEFAULT_TOP_N: usize = 5;

/// The `n` results with the lowest semantic score, ascending.
///
/// Ties keep their input order.
pub fn lowest_scoring(results: &[ComparisonResult], n: usize) -> Vec<&ComparisonResult> {
    let mut sorted: Vec<&ComparisonResult> = results.iter().collect();
    sorted.sort_by(|a, b| {
        a.semantic_score
            .partial_cmp(&b.semantic_score)
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

/// Write the human-readable summary followed by the weakest answers.
pub fn write_summary<W: Write>(
    out: &mut W,
    summary: &Summary,
    results: &[ComparisonResult],
    top_n: usize,
) -> io::Result<()> {
    writeln!(out)?;

    if summary.is_empty() {
        writeln!(
            out,
            "[!] No answers were eligible for scoring (threshold = {})",
            summary.semantic_threshold
        )?;
        writeln!(
            out,
            "    Skipped {} benchmark entries and {} empty responses",
            summary.skipped_benchmark, summary.skipped_generated
        )?;
        return Ok(());
    }

    writeln!(
        out,
        "[✔] {}/{} answers passed (threshold = {})",
        summary.passed, summary.total, summary.semantic_threshold
    )?;
    writeln!(out, "[i] Accuracy: {:.2}%", summary.accuracy)?;
    if summary.skipped_benchmark + summary.skipped_generated > 0 {
        writeln!(
            out,
            "[i] Skipped {} benchmark entries and {} empty responses",
            summary.skipped_benchmark, summary.skipped_generated
        )?;
    }

    let lowest = lowest_scoring(results, top_n);
    if !lowest.is_empty() {
        writeln!(out)?;
        writeln!(out, "Top {} answers with lowest similarity:", top_n)?;
        for result in lowest {
            let status = if result.passed { "PASS" } else { "FAIL" };
            writeln!(
                out,
                "  {} ID {} - Score: {} | Question: {}",
                status, result.id, result.semantic_score, result.question
            )?;
        }
    }

    Ok(())
}

/// Print the summary to stdout.
pub fn print_summary(summary: &Summary, results: &[ComparisonResult], top_n: usize) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_summary(&mut handle, summary, results, top_n)
        .map_err(|e| ValidatorError::io("<stdout>", e))
}

/// Save all results as indented JSON, keeping non-ASCII text as is.
pub fn save_report(results: &[ComparisonResult], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ValidatorError::io(parent, e))?;
        }
    }

    let json = serde_json::to_string_pretty(results)
        .map_err(|e| ValidatorError::Serialization(e.to_string()))?;
    fs::write(path, json).map_err(|e| ValidatorError::io(path, e))?;

    tracing::info!("Saved {} results to {}", results.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn result(id: &str, semantic_score: f64, passed: bool) -> ComparisonResult {
        ComparisonResult {
            id: id.to_string(),
            question: format!("Question {}", id),
            expected: "expected".to_string(),
            generated: "generated".to_string(),
            rouge_score: 0.5,
            semantic_score,
            passed,
            expected_score: 0.85,
        }
    }

    fn summary(total: usize, passed: usize) -> Summary {
        Summary {
            total,
            passed,
            failed: total - passed,
            accuracy: if total > 0 { passed as f64 / total as f64 * 100.0 } else { 0.0 },
            semantic_threshold: 0.85,
            skipped_benchmark: 0,
            skipped_generated: 0,
        }
    }

    #[test]
    fn test_lowest_scoring_sorted_and_stable() {
        let results = vec![
            result("a", 0.9, true),
            result("b", 0.4, false),
            result("c", 0.7, false),
            result("d", 0.4, false),
        ];

        let lowest = lowest_scoring(&results, 3);
        let ids: Vec<&str> = lowest.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c"]);
    }

    #[test]
    fn test_lowest_scoring_fewer_than_n() {
        let results = vec![result("a", 0.9, true)];
        assert_eq!(lowest_scoring(&results, 5).len(), 1);
        assert!(lowest_scoring(&[], 5).is_empty());
    }

    #[test]
    fn test_write_summary() {
        let results = vec![result("1", 0.95, true), result("2", 0.3, false)];
        let mut out = Vec::new();
        write_summary(&mut out, &summary(2, 1), &results, 5).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1/2 answers passed (threshold = 0.85)"));
        assert!(text.contains("Accuracy: 50.00%"));
        assert!(text.contains("FAIL ID 2 - Score: 0.3 | Question: Question 2"));
        assert!(text.find("ID 2").unwrap() < text.find("ID 1").unwrap());
    }

    #[test]
    fn test_write_summary_limits_listing() {
        let results: Vec<_> = (0..8).map(|i| result(&i.to_string(), i as f64 / 10.0, false)).collect();
        let mut out = Vec::new();
        write_summary(&mut out, &summary(8, 0), &results, 2).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("FAIL ID").count(), 2);
    }

    #[test]
    fn test_write_summary_empty() {
        let mut out = Vec::new();
        write_summary(&mut out, &summary(0, 0), &[], 5).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No answers were eligible"));
        assert!(!text.contains("Accuracy"));
    }

    #[test]
    fn test_save_report_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("comparison_result.json");

        let mut entry = result("1", 0.91, true);
        entry.expected = "La capital de España es Madrid.".to_string();
        save_report(&[entry.clone()], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("España"));
        assert!(content.starts_with("[\n  {\n    \"id\": \"1\""));

        let loaded: Vec<ComparisonResult> = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, vec![entry]);
    }

    #[test]
    fn test_save_report_unwritable_path() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be overwritten as a file.
        let err = save_report(&[], dir.path()).unwrap_err();
        assert!(matches!(err, ValidatorError::Io { .. }));
    }
}
