//! Run parameters for the validator.
//!
//! Parameters come from a JSON (or YAML) file passed on the command line.
//! Environment variables take precedence over file values.

use crate::error::{Result, ValidatorError};
use crate::report::DEFAULT_TOP_N;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Default report destination.
pub const DEFAULT_OUTPUT_PATH: &str = "comparison_result.json";

/// Default pass/fail cutoff on the semantic score.
pub const DEFAULT_SEMANTIC_THRESHOLD: f64 = 0.85;

/// Default local directory holding the sentence-transformers model.
pub const DEFAULT_MODEL_PATH: &str = "models/all-MiniLM-L6-v2";

/// Hub repository used when the local model directory is missing.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Parameters for one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Benchmark file: JSON array of `{id, question, answer}`.
    pub json_path_benchmark: PathBuf,

    /// Generated answers file: JSON array of `{id, answer}`.
    pub json_path_responses: PathBuf,

    /// Where the comparison report is written.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Minimum semantic similarity for an answer to pass.
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f64,

    /// Local model directory (config.json, tokenizer.json, weights).
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Hugging Face repository id to download when `model_path` is absent.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Number of lowest-scoring answers shown in the console summary.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_semantic_threshold() -> f64 {
    DEFAULT_SEMANTIC_THRESHOLD
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Parameter file format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsFormat {
    Json,
    Yaml,
}

impl ParamsFormat {
    /// Determine format from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ParamsFormat::Yaml,
            _ => ParamsFormat::Json,
        }
    }
}

impl Params {
    /// Create parameters for the two input files, with defaults for everything else.
    pub fn new(benchmark: impl Into<PathBuf>, responses: impl Into<PathBuf>) -> Self {
        Self {
            json_path_benchmark: benchmark.into(),
            json_path_responses: responses.into(),
            output_path: default_output_path(),
            semantic_threshold: default_semantic_threshold(),
            model_path: default_model_path(),
            model_id: default_model_id(),
            top_n: default_top_n(),
        }
    }

    /// Load parameters from a file, then apply environment overrides.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (VALIDATOR_SEMANTIC_THRESHOLD, VALIDATOR_OUTPUT_PATH, VALIDATOR_MODEL_PATH)
    /// 2. The parameter file
    /// 3. Default values
    pub fn load(path: &Path) -> Result<Self> {
        let mut params = Self::load_from_file(path)?;
        params.apply_overrides(|key| env::var(key).ok());
        params.validate()?;
        Ok(params)
    }

    /// Load parameters from a specific file path without overrides.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ValidatorError::not_found("Parameters", path));
        }

        let content = std::fs::read_to_string(path).map_err(|e| ValidatorError::io(path, e))?;

        let params = match ParamsFormat::from_path(path) {
            ParamsFormat::Json => serde_json::from_str(&content).map_err(|e| {
                ValidatorError::Config(format!(
                    "Failed to parse parameter file '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            ParamsFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| {
                ValidatorError::Config(format!(
                    "Failed to parse parameter file '{}': {}",
                    path.display(),
                    e
                ))
            })?,
        };

        tracing::debug!("Loaded parameters from {}", path.display());
        Ok(params)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(threshold) = lookup("VALIDATOR_SEMANTIC_THRESHOLD") {
            if let Ok(value) = threshold.trim().parse() {
                self.semantic_threshold = value;
            }
        }

        if let Some(output) = lookup("VALIDATOR_OUTPUT_PATH") {
            if !output.is_empty() {
                self.output_path = PathBuf::from(output);
            }
        }

        if let Some(model) = lookup("VALIDATOR_MODEL_PATH") {
            if !model.is_empty() {
                self.model_path = PathBuf::from(model);
            }
        }
    }

    /// Validate parameter values.
    pub fn validate(&self) -> Result<()> {
        if !self.semantic_threshold.is_finite() {
            return Err(ValidatorError::Config(format!(
                "semantic_threshold must be a finite number, got {}",
                self.semantic_threshold
            )));
        }

        if !(-1.0..=1.0).contains(&self.semantic_threshold) {
            tracing::warn!(
                "semantic_threshold {} is outside [-1, 1]; every answer will {}",
                self.semantic_threshold,
                if self.semantic_threshold > 1.0 { "fail" } else { "pass" }
            );
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ValidatorError::Config(
                "output_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_applied() {
        let params: Params = serde_json::from_str(
            r#"{"json_path_benchmark": "b.json", "json_path_responses": "r.json"}"#,
        )
        .unwrap();
        assert_eq!(params.json_path_benchmark, PathBuf::from("b.json"));
        assert_eq!(params.output_path, PathBuf::from("comparison_result.json"));
        assert_eq!(params.semantic_threshold, 0.85);
        assert_eq!(params.model_path, PathBuf::from("models/all-MiniLM-L6-v2"));
        assert_eq!(params.model_id, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(params.top_n, 5);
    }

    #[test]
    fn test_missing_required_key_fails_at_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{"json_path_benchmark": "b.json"}"#).unwrap();

        let err = Params::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ValidatorError::Config(_)));
        assert!(err.to_string().contains("json_path_responses"));
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.yaml");
        fs::write(
            &path,
            "json_path_benchmark: b.json\njson_path_responses: r.json\nsemantic_threshold: 0.7\n",
        )
        .unwrap();

        let params = Params::load_from_file(&path).unwrap();
        assert_eq!(params.semantic_threshold, 0.7);
        assert_eq!(params.json_path_responses, PathBuf::from("r.json"));
    }

    #[test]
    fn test_missing_params_file() {
        let err = Params::load_from_file(Path::new("/nonexistent/params.json")).unwrap_err();
        assert!(matches!(err, ValidatorError::NotFound { .. }));
    }

    #[test]
    fn test_overrides() {
        let mut params = Params::new("b.json", "r.json");
        params.apply_overrides(|key| match key {
            "VALIDATOR_SEMANTIC_THRESHOLD" => Some("0.6".to_string()),
            "VALIDATOR_OUTPUT_PATH" => Some("out/report.json".to_string()),
            _ => None,
        });
        assert_eq!(params.semantic_threshold, 0.6);
        assert_eq!(params.output_path, PathBuf::from("out/report.json"));
        assert_eq!(params.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_unparsable_override_ignored() {
        let mut params = Params::new("b.json", "r.json");
        params.apply_overrides(|key| {
            (key == "VALIDATOR_SEMANTIC_THRESHOLD").then(|| "high".to_string())
        });
        assert_eq!(params.semantic_threshold, DEFAULT_SEMANTIC_THRESHOLD);
    }

    #[test]
    fn test_validate_threshold_range() {
        let mut params = Params::new("b.json", "r.json");
        assert!(params.validate().is_ok());

        // Out-of-range values are accepted; the run just passes or fails everything.
        params.semantic_threshold = 1.5;
        assert!(params.validate().is_ok());

        params.semantic_threshold = -3.0;
        assert!(params.validate().is_ok());

        params.semantic_threshold = f64::NAN;
        assert!(matches!(params.validate(), Err(ValidatorError::Config(_))));

        params.semantic_threshold = f64::INFINITY;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ParamsFormat::from_path(Path::new("p.json")), ParamsFormat::Json);
        assert_eq!(ParamsFormat::from_path(Path::new("p.yml")), ParamsFormat::Yaml);
        assert_eq!(ParamsFormat::from_path(Path::new("p.yaml")), ParamsFormat::Yaml);
        assert_eq!(ParamsFormat::from_path(Path::new("params")), ParamsFormat::Json);
    }
}
