//! Model gateway backed by a local Ollama server.
//!
//! Defines the [`ModelGateway`] trait used by the README pipeline and the
//! [`OllamaClient`] implementation, which talks to three endpoints:
//!
//! | Method | Path | Use |
//! |--------|------|-----|
//! | `GET`  | `/api/tags` | list the model catalog |
//! | `POST` | `/api/pull` | download a missing model (blocking, non-streaming) |
//! | `POST` | `/api/generate` | one non-streaming completion |
//!
//! Availability checks are best effort: if the catalog cannot be read or the
//! pull fails, the error is logged and generation is attempted anyway.
//! Generation errors are returned to the caller. Nothing is retried.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::OllamaConfig;

/// A text-generation backend that can make sure a model is present and run
/// a single completion against it.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Make sure `model` is available, pulling it if needed. Never fails.
    async fn ensure_available(&self, model: &str);

    /// Run one non-streaming completion and return the response text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

/// One entry of the `/api/tags` catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<CatalogEntry>,
}

/// Returns true if the catalog holds `model`, either exactly or with the same
/// name before the first `:` (so `llama3.1:latest` satisfies `llama3.1:8b`).
pub fn catalog_contains(catalog: &[CatalogEntry], model: &str) -> bool {
    let wanted_base = base_name(model);
    catalog
        .iter()
        .any(|m| m.name == model || base_name(&m.name) == wanted_base)
}

fn base_name(model: &str) -> &str {
    model.split(':').next().unwrap_or(model)
}

pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current model catalog.
    pub async fn list_models(&self) -> Result<Vec<CatalogEntry>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Ollama connection error (is Ollama running at {}?): {}",
                    self.base_url,
                    e
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Ollama API error {}: {}", status, body_text);
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models)
    }

    /// Pull `model` and wait until Ollama reports completion.
    pub async fn pull(&self, model: &str) -> Result<()> {
        let body = serde_json::json!({
            "name": model,
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/pull", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Ollama pull of {} failed {}: {}", model, status, body_text);
        }

        Ok(())
    }
}

#[async_trait]
impl ModelGateway for OllamaClient {
    async fn ensure_available(&self, model: &str) {
        let catalog = match self.list_models().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(model, error = %e, "could not read model catalog, continuing");
                return;
            }
        };

        if catalog_contains(&catalog, model) {
            tracing::debug!(model, "model already available");
            return;
        }

        tracing::info!(model, "model not found, pulling");
        match self.pull(model).await {
            Ok(()) => tracing::info!(model, "model pull complete"),
            Err(e) => tracing::warn!(model, error = %e, "model pull failed, continuing"),
        }
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
        });

        tracing::info!(model, prompt_bytes = prompt.len(), "requesting completion");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Ollama connection error (is Ollama running at {}?): {}",
                    self.base_url,
                    e
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Ollama API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        parse_generate_response(&json)
    }
}

fn parse_generate_response(json: &serde_json::Value) -> Result<String> {
    json.get("response")
        .and_then(|r| r.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing response field"))
}
