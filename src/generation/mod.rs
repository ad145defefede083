// Generation module
// Ollama-backed answer generation for composed prompts


use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::config::OllamaConfig;
use crate::{GuideError, Result};

// Local generation on CPU can take a while for long contexts
const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Generation provider seam
///
/// The chat controller only needs "prompt in, answer out", so tests
/// substitute a canned generator without a running Ollama instance.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct GenerationClient {
    base_url: Url,
    model: String,
    temperature: f32,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl GenerationClient {
    #[inline]
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let base_url = config
            .ollama_url()
            .map_err(|e| GuideError::Config(format!("Failed to build Ollama URL: {}", e)))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            base_url,
            model: config.generation_model,
            temperature: config.temperature,
            agent,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        self
    }

    /// Generate a completion for the composed prompt
    ///
    /// One synchronous call: either the full response string comes back or
    /// the turn fails. No retry, no streaming, no partial output.
    #[inline]
    pub fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            "Generating completion with model {} (prompt length: {})",
            self.model,
            prompt.len()
        );

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let url = self
            .base_url
            .join("/api/generate")
            .map_err(|e| GuideError::Inference(format!("Failed to build generation URL: {}", e)))?;

        let request_json = serde_json::to_string(&request).map_err(|e| {
            GuideError::Inference(format!("Failed to serialize generation request: {}", e))
        })?;

        let response_text = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| GuideError::Inference(format!("Generation request failed: {}", e)))?;

        let generate_response: GenerateResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                GuideError::Inference(format!("Failed to parse generation response: {}", e))
            })?;

        info!(
            "Generated completion ({} characters)",
            generate_response.response.len()
        );

        Ok(generate_response.response)
    }
}

impl Generator for GenerationClient {
    #[inline]
    fn generate(&self, prompt: &str) -> Result<String> {
        GenerationClient::generate(self, prompt)
    }
}
