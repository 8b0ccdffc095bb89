//! HTTP service abstractions and implementations

mod backend;
mod ollama;

pub use backend::BackendClient;
pub use ollama::OllamaCatalog;

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur when talking to a remote service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Reply from the chat endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// The model's reply text
    pub reply: String,
}

/// A benchmark as listed by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkInfo {
    /// Human-readable description of the benchmark
    pub description: String,
}

/// One prompt/response pair from an evaluation run
#[derive(Debug, Clone, Deserialize)]
pub struct EvalCase {
    pub prompt: String,
    pub response: String,
}

/// Outcome of a completed evaluation run
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationSummary {
    /// Backend-reported status, e.g. "Completed"
    pub status: String,
    /// Prompt/response pairs in benchmark order
    pub results: Vec<EvalCase>,
}

/// An entry in the Ollama model listing
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub details: Option<ModelDetails>,
}

/// Optional metadata attached to a model listing entry
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDetails {
    #[serde(default)]
    pub parameter_size: Option<String>,
}

impl ModelEntry {
    /// Label shown in a selector, with the parameter size when known
    pub fn display_label(&self) -> String {
        match self
            .details
            .as_ref()
            .and_then(|d| d.parameter_size.as_deref())
        {
            Some(size) => format!("{} ({})", self.name, size),
            None => self.name.clone(),
        }
    }
}

/// Trait for the benchmarking backend
#[async_trait]
pub trait BenchService: Send + Sync {
    /// Send a single chat message to a model and get its reply
    async fn chat(&self, model_id: &str, message: &str) -> Result<ChatReply, ApiError>;

    /// List available benchmarks keyed by name
    async fn list_benchmarks(&self) -> Result<BTreeMap<String, BenchmarkInfo>, ApiError>;

    /// Run a benchmark against a model
    async fn run_evaluation(
        &self,
        model_id: &str,
        benchmark_name: &str,
    ) -> Result<EvaluationSummary, ApiError>;
}

/// Trait for a model listing source
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// List the models currently available for selection
    async fn list_models(&self) -> Result<Vec<ModelEntry>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_with_parameter_size() {
        let entry = ModelEntry {
            name: "llama3.2:3b".to_string(),
            details: Some(ModelDetails {
                parameter_size: Some("3.2B".to_string()),
            }),
        };
        assert_eq!(entry.display_label(), "llama3.2:3b (3.2B)");
    }

    #[test]
    fn test_display_label_without_details() {
        let entry = ModelEntry {
            name: "phi3:3.8b".to_string(),
            details: None,
        };
        assert_eq!(entry.display_label(), "phi3:3.8b");
    }

    #[test]
    fn test_status_error_display() {
        let error = ApiError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "benchmark not found".to_string(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("404"));
        assert!(rendered.contains("benchmark not found"));
    }
}
