//! Terminal console for an Ollama benchmarking service
//!
//! This crate provides:
//! - Typed HTTP clients for the benchmarking backend and the Ollama model listing
//! - A chat session and a benchmark-evaluation session built on those clients
//! - Two terminal frontends (`chat`, `eval`) that mount the sessions

pub mod api;
pub mod chat;
pub mod evaluation;
pub mod picker;
pub mod transcript;

pub use chat::ChatSession;
pub use evaluation::EvaluationSession;

/// Configuration for the console
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Base URL of the benchmarking backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Base URL of the Ollama server used for model listing
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            ollama_url: default_ollama_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
