//! End-to-end validation run: load, score, report.

use crate::comparator::{Comparator, Comparison};
use crate::config::Params;
use crate::dataset::{BenchmarkEntry, GeneratedEntry, load_benchmark, load_responses};
use crate::embeddings::{Embedder, EmbeddingModel};
use crate::error::{Result, ValidatorError};
use crate::report::{print_summary, save_report};
use crate::rouge::RougeScorer;
use crate::semantic::SemanticScorer;
use std::time::Instant;

/// Fail fast if either input file is missing.
pub fn check_inputs(params: &Params) -> Result<()> {
    if !params.json_path_benchmark.exists() {
        return Err(ValidatorError::not_found("Benchmark", &params.json_path_benchmark));
    }
    if !params.json_path_responses.exists() {
        return Err(ValidatorError::not_found("Responses", &params.json_path_responses));
    }
    Ok(())
}

/// Validate generated answers with the embedding model named in `params`.
///
/// Both input files are parsed before the model is loaded.
pub fn validate_llm_responses(params: &Params) -> Result<Comparison> {
    let (benchmark, generated) = load_inputs(params)?;

    let start = Instant::now();
    let model = EmbeddingModel::load(&params.model_path, &params.model_id)?;
    tracing::info!("Loaded embedding model in {:.2?}", start.elapsed());

    compare_and_report(params, &benchmark, &generated, &model)
}

/// Run the full pipeline with an already-loaded embedding model.
pub fn run_with_embedder(params: &Params, embedder: &dyn Embedder) -> Result<Comparison> {
    let (benchmark, generated) = load_inputs(params)?;
    compare_and_report(params, &benchmark, &generated, embedder)
}

fn load_inputs(params: &Params) -> Result<(Vec<BenchmarkEntry>, Vec<GeneratedEntry>)> {
    check_inputs(params)?;

    let benchmark = load_benchmark(&params.json_path_benchmark)?;
    let generated = load_responses(&params.json_path_responses)?;
    Ok((benchmark, generated))
}

fn compare_and_report(
    params: &Params,
    benchmark: &[BenchmarkEntry],
    generated: &[GeneratedEntry],
    embedder: &dyn Embedder,
) -> Result<Comparison> {
    let semantic = SemanticScorer::new(embedder);
    tracing::info!(
        "Comparing {} generated answers against {} benchmark entries with {}",
        generated.len(),
        benchmark.len(),
        semantic.model_name()
    );

    let start = Instant::now();
    let rouge = RougeScorer::default();
    let comparator = Comparator::new(&rouge, semantic, params.semantic_threshold);
    let comparison = comparator.compare(benchmark, generated)?;
    tracing::info!(
        "Scored {} answers in {:.2?}",
        comparison.summary.total,
        start.elapsed()
    );

    print_summary(&comparison.summary, &comparison.results, params.top_n)?;
    save_report(&comparison.results, &params.output_path)?;
    println!("\nReport saved to: {}\n", params.output_path.display());

    Ok(comparison)
}
