//! Semantic similarity between two texts.

use crate::embeddings::{Embedder, cosine_similarity};
use crate::error::{Result, ValidatorError};

/// Scores meaning-level closeness with a borrowed embedding model.
///
/// The model is loaded once per run and shared by reference; the scorer
/// holds no state of its own.
#[derive(Clone, Copy)]
pub struct SemanticScorer<'a> {
    embedder: &'a dyn Embedder,
}

impl<'a> SemanticScorer<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self { embedder }
    }

    /// Name of the underlying model.
    pub fn model_name(&self) -> &str {
        self.embedder.name()
    }

    /// Cosine similarity of the two texts' embeddings, in [-1, 1].
    pub fn score(&self, expected: &str, generated: &str) -> Result<f64> {
        let embeddings = self.embedder.embed_batch(&[expected, generated])?;

        match embeddings.as_slice() {
            [a, b] => Ok(cosine_similarity(a, b)),
            other => Err(ValidatorError::Embedding(format!(
                "expected 2 embeddings, model returned {}",
                other.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::mock::{BagOfWordsEmbedder, FailingEmbedder};

    #[test]
    fn test_self_similarity_is_one() {
        let scorer = SemanticScorer::new(&BagOfWordsEmbedder);
        let score = scorer.score("The cat sat on the mat.", "The cat sat on the mat.").unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let scorer = SemanticScorer::new(&BagOfWordsEmbedder);
        let a = "Rust uses ownership for memory safety.";
        let b = "Memory safety in Rust comes from the borrow checker.";
        assert!((scorer.score(a, b).unwrap() - scorer.score(b, a).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_unrelated_text_scores_low() {
        let scorer = SemanticScorer::new(&BagOfWordsEmbedder);
        let score = scorer.score("The cat sat on the mat.", "Bananas are yellow.").unwrap();
        assert!(score < 0.85);
    }

    #[test]
    fn test_model_name_comes_from_embedder() {
        assert_eq!(SemanticScorer::new(&BagOfWordsEmbedder).model_name(), "bag-of-words");
        assert_eq!(SemanticScorer::new(&FailingEmbedder).model_name(), "failing");
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let scorer = SemanticScorer::new(&FailingEmbedder);
        assert!(matches!(
            scorer.score("a", "b"),
            Err(ValidatorError::Embedding(_))
        ));
    }
}
