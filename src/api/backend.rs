//! Benchmarking backend client

use super::{ApiError, BenchService, BenchmarkInfo, ChatReply, EvaluationSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Client for the benchmarking backend's chat and evaluation endpoints
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }
}

/// Chat request body
#[derive(Serialize)]
struct ChatRequest<'a> {
    model_id: &'a str,
    message: &'a str,
}

/// Evaluation request body
#[derive(Serialize)]
struct EvaluationRequest<'a> {
    model_id: &'a str,
    benchmark_name: &'a str,
}

#[async_trait]
impl BenchService for BackendClient {
    async fn chat(&self, model_id: &str, message: &str) -> Result<ChatReply, ApiError> {
        let request = ChatRequest { model_id, message };

        let response = self
            .client
            .post(self.endpoint("/chat"))
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let reply = serde_json::from_str(&body)?;
        Ok(reply)
    }

    async fn list_benchmarks(&self) -> Result<BTreeMap<String, BenchmarkInfo>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/benchmarks"))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let listing = serde_json::from_str(&body)?;
        Ok(listing)
    }

    async fn run_evaluation(
        &self,
        model_id: &str,
        benchmark_name: &str,
    ) -> Result<EvaluationSummary, ApiError> {
        let request = EvaluationRequest {
            model_id,
            benchmark_name,
        };

        let response = self
            .client
            .post(self.endpoint("/run_evaluation"))
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let summary = serde_json::from_str(&body)?;
        Ok(summary)
    }
}
