//! Gemini provider implementation

use super::{GeminiConfig, auth::GeminiAuth, types::*};
use crate::{
    Content, EmbeddingVector, Error, LLMRequest, LLMResponse, Result, TaskType,
    providers::provider::{Capability, ModelInfo, Provider, ProviderMetadata},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Gemini provider with text generation and embedding support
pub struct GeminiProvider {
    client: Client,
    auth: GeminiAuth,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(auth: GeminiAuth, config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            auth,
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Get static metadata
    pub fn static_metadata() -> ProviderMetadata {
        ProviderMetadata {
            name: "gemini".to_string(),
            display_name: "Google Gemini".to_string(),
            capabilities: vec![Capability::TextGeneration, Capability::Embedding],
            models: vec![
                ModelInfo {
                    id: "gemini-2.5-pro-exp-03-25".to_string(),
                    display_name: "Gemini 2.5 Pro Experimental".to_string(),
                    capabilities: vec![Capability::TextGeneration],
                    embedding_dimensions: None,
                },
                ModelInfo {
                    id: "gemini-2.0-flash".to_string(),
                    display_name: "Gemini 2.0 Flash".to_string(),
                    capabilities: vec![Capability::TextGeneration],
                    embedding_dimensions: None,
                },
                ModelInfo {
                    id: "embedding-001".to_string(),
                    display_name: "Embedding 001".to_string(),
                    capabilities: vec![Capability::Embedding],
                    embedding_dimensions: Some(768),
                },
                ModelInfo {
                    id: "text-embedding-004".to_string(),
                    display_name: "Text Embedding 004".to_string(),
                    capabilities: vec![Capability::Embedding],
                    embedding_dimensions: Some(768),
                },
            ],
        }
    }

    fn build_url(&self, model: &str, method: &str) -> String {
        format!("{}/{}:{}", self.config.base_url, model, method)
    }

    /// POST a JSON body and return the raw response text of a 2xx reply
    async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<String> {
        let req_builder = self.auth.apply(self.client.post(url).json(body));

        let response = req_builder
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| {
                Error::upstream(format!("Failed to read response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<GeminiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(Error::upstream(format!(
                "Gemini API error {}: {}",
                status, detail
            )));
        }

        Ok(text)
    }
}

fn api_error(error: GeminiError) -> Error {
    Error::upstream(format!(
        "Gemini API error: {} (code: {})",
        error.message,
        error.code.unwrap_or(0)
    ))
}

#[async_trait]
impl Provider for GeminiProvider {
    fn metadata(&self) -> ProviderMetadata {
        Self::static_metadata()
    }

    async fn generate_content(&self, request: LLMRequest) -> Result<LLMResponse> {
        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model
        };
        let url = self.build_url(&model, "generateContent");

        let gemini_req = GeminiRequest {
            contents: request.contents,
        };

        tracing::debug!(model = %model, "Sending generateContent request");
        let body = self.post_json(&url, &gemini_req).await?;

        let gemini_resp: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| Error::upstream(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = gemini_resp.error {
            return Err(api_error(error));
        }

        let candidate = gemini_resp.candidates.into_iter().next();
        Ok(LLMResponse {
            content: candidate.as_ref().and_then(|c| c.content.clone()),
            finish_reason: candidate.and_then(|c| c.finish_reason),
        })
    }

    async fn embed_content(&self, text: String, task_type: TaskType) -> Result<EmbeddingVector> {
        let embedding_model = &self.config.embedding_model;
        let url = self.build_url(embedding_model, "embedContent");

        let request_body = EmbedContentRequest {
            model: format!("models/{}", embedding_model),
            content: Content {
                role: String::new(),
                parts: vec![crate::Part::Text { text }],
            },
            task_type,
        };

        tracing::debug!(model = %embedding_model, task_type = %task_type, "Sending embedContent request");
        let body = self.post_json(&url, &request_body).await?;

        let response: EmbedContentResponse = serde_json::from_str(&body).map_err(|e| {
            Error::upstream(format!("Failed to parse embedding response: {}", e))
        })?;

        if let Some(error) = response.error {
            return Err(api_error(error));
        }

        let values = response
            .embedding
            .map(|embedding| embedding.values)
            .filter(|values| !values.is_empty())
            .ok_or_else(|| Error::upstream("Missing embedding values"))?;

        Ok(EmbeddingVector::new(values))
    }

    fn embedding_dimensions(&self) -> Option<usize> {
        Some(768)
    }
}
