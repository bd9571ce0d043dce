//! Answer Validator - scores generated LLM answers against a benchmark.
//!
//! Each generated answer is paired with the benchmark entry sharing its id
//! and scored two ways:
//! 1. ROUGE-L F-measure (lexical overlap of stemmed tokens)
//! 2. Cosine similarity of sentence embeddings (all-MiniLM-L6-v2 by default)
//!
//! An answer passes when its semantic similarity reaches the configured
//! threshold.
//!
//! # Quick Start
//!
//! ```no_run
//! use answer_validator::{Params, validate_llm_responses};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let params = Params::load(Path::new("params.json"))?;
//!     let comparison = validate_llm_responses(&params)?;
//!     println!("accuracy: {}%", comparison.summary.accuracy);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **dataset**: Benchmark and response file loading
//! - **rouge**: ROUGE-L scorer
//! - **embeddings** / **semantic**: Embedding model and cosine similarity
//! - **comparator**: Grouping, scoring and pass/fail aggregation
//! - **report**: Console summary and JSON report
//! - **validator**: The end-to-end run

pub mod comparator;
pub mod config;
pub mod dataset;
pub mod embeddings;
pub mod error;
pub mod report;
pub mod rouge;
pub mod semantic;
pub mod validator;

// Re-export commonly used types
pub use comparator::{Comparator, Comparison, ComparisonResult, Summary};
pub use config::Params;
pub use dataset::{BenchmarkEntry, GeneratedEntry, load_benchmark, load_responses};
pub use embeddings::{Embedder, EmbeddingModel, cosine_similarity};
pub use error::{Result, ValidatorError};
pub use report::{lowest_scoring, print_summary, save_report};
pub use rouge::{RougeScore, RougeScorer, rouge_l_fmeasure};
pub use semantic::SemanticScorer;
pub use validator::{run_with_embedder, validate_llm_responses};
