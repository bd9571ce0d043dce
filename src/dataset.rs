//! Loading benchmark and generated-answer files.
//!
//! Both files are JSON arrays of objects. Ids may be written as strings or
//! integers and are normalised to strings.

use crate::error::{Result, ValidatorError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A benchmark question with its expected (gold) answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Identifier shared with generated answers.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// The question text.
    #[serde(default)]
    pub question: String,
    /// The expected answer.
    #[serde(default)]
    pub answer: String,
}

/// One generated answer for a benchmark id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub answer: String,
}

impl BenchmarkEntry {
    pub fn new(id: impl Into<String>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

impl GeneratedEntry {
    pub fn new(id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::UInt(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

/// Read and parse a JSON file into `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ValidatorError::not_found("JSON", path));
    }

    let file = File::open(path).map_err(|e| ValidatorError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ValidatorError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the benchmark file.
pub fn load_benchmark(path: &Path) -> Result<Vec<BenchmarkEntry>> {
    let entries: Vec<BenchmarkEntry> = load_json(path)?;
    tracing::debug!("Loaded {} benchmark entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Load the generated responses file.
pub fn load_responses(path: &Path) -> Result<Vec<GeneratedEntry>> {
    let entries: Vec<GeneratedEntry> = load_json(path)?;
    tracing::debug!("Loaded {} generated answers from {}", entries.len(), path.display());
    Ok(entries)
}
