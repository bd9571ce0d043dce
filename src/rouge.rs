//! ROUGE-L lexical overlap scoring.
//!
//! Tokens are lowercased alphanumeric runs. With stemming enabled, tokens
//! longer than three characters are reduced with the English Snowball stemmer
//! before the longest common subsequence is computed.

use rust_stemmers::{Algorithm, Stemmer};

/// ROUGE score components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

/// ROUGE-L scorer.
pub struct RougeScorer {
    stemmer: Option<Stemmer>,
}

impl Default for RougeScorer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RougeScorer {
    /// Create a scorer, optionally stemming tokens.
    pub fn new(use_stemmer: bool) -> Self {
        Self {
            stemmer: use_stemmer.then(|| Stemmer::create(Algorithm::English)),
        }
    }

    /// Split text into comparison tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        normalized
            .split_whitespace()
            .map(|token| match &self.stemmer {
                Some(stemmer) if token.chars().count() > 3 => stemmer.stem(token).into_owned(),
                _ => token.to_string(),
            })
            .collect()
    }

    /// Score `candidate` against `reference` with ROUGE-L.
    pub fn score(&self, reference: &str, candidate: &str) -> RougeScore {
        let ref_tokens = self.tokenize(reference);
        let cand_tokens = self.tokenize(candidate);

        if ref_tokens.is_empty() || cand_tokens.is_empty() {
            return RougeScore::default();
        }

        let lcs = lcs_length(&ref_tokens, &cand_tokens) as f64;
        let precision = lcs / cand_tokens.len() as f64;
        let recall = lcs / ref_tokens.len() as f64;

        let fmeasure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        RougeScore {
            precision,
            recall,
            fmeasure,
        }
    }

    /// ROUGE-L F-measure in [0, 1].
    pub fn fmeasure(&self, reference: &str, candidate: &str) -> f64 {
        self.score(reference, candidate).fmeasure
    }
}

/// ROUGE-L F-measure with stemming enabled.
pub fn rouge_l_fmeasure(reference: &str, candidate: &str) -> f64 {
    RougeScorer::default().fmeasure(reference, candidate)
}

/// Length of the longest common subsequence, using two DP rows.
fn lcs_length(a: &[String], b: &[String]) -> usize {
    let (short, long) = if a.len() < b.len() { (a, b) } else { (b, a) };

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for item in long {
        for j in 1..=short.len() {
            curr[j] = if *item == short[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
