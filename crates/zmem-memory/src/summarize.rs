//! Summarization pipeline

use std::sync::Arc;
use zmem_core::{Error, LLMRequest, Provider, Result};

/// Separator placed between retrieved texts
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Instruction prompt asking for a summary grounded in `context`
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Concisely summarize the following text relevant to the query '{query}'. \
         Respond ONLY with the precise summary itself, without any introductory or \
         concluding phrases:\n\n---\n{context}\n---"
    )
}

pub struct Summarizer {
    provider: Arc<dyn Provider>,
    model: Option<String>,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Use a specific generation model instead of the provider default
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Summarize `texts` with respect to `query`
    ///
    /// No texts means no context: the result is an empty string and the
    /// provider is not called.
    pub async fn summarize(&self, texts: &[String], query: &str) -> Result<String> {
        if texts.is_empty() {
            return Ok(String::new());
        }

        let context = texts.join(CONTEXT_SEPARATOR);
        let mut request = LLMRequest::from_prompt(build_prompt(&context, query));
        if let Some(model) = &self.model {
            request.model = model.clone();
        }

        let preview: String = query.chars().take(60).collect();
        tracing::info!(query = %preview, chunks = texts.len(), "Generating summary");

        let response = self.provider.generate_content(request).await?;
        match response.text() {
            Some(text) if !text.is_empty() => Ok(text),
            _ => {
                tracing::warn!("Summary generation returned no content");
                Err(Error::validation(
                    "Summary generation failed (empty response from model).",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use zmem_core::{
        Content, EmbeddingVector, ErrorKind, LLMResponse, ProviderMetadata, TaskType,
    };

    mock! {
        pub Model {}

        #[async_trait]
        impl Provider for Model {
            fn metadata(&self) -> ProviderMetadata;
            async fn generate_content(&self, request: LLMRequest) -> Result<LLMResponse>;
            async fn embed_content(&self, text: String, task_type: TaskType) -> Result<EmbeddingVector>;
        }
    }

    fn reply(text: Option<&str>) -> LLMResponse {
        LLMResponse {
            content: text.map(Content::new_model_text),
            finish_reason: Some("STOP".to_string()),
        }
    }

    #[test]
    fn test_prompt_text() {
        assert_eq!(
            build_prompt("A\n---\nB", "topic"),
            "Concisely summarize the following text relevant to the query 'topic'. \
             Respond ONLY with the precise summary itself, without any introductory or \
             concluding phrases:\n\n---\nA\n---\nB\n---"
        );
    }

    #[tokio::test]
    async fn test_empty_texts_skip_provider() {
        let mut model = MockModel::new();
        model.expect_generate_content().times(0);

        let summarizer = Summarizer::new(Arc::new(model));
        assert_eq!(summarizer.summarize(&[], "anything").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_texts_joined_into_one_prompt() {
        let mut model = MockModel::new();
        model
            .expect_generate_content()
            .withf(|request| {
                let prompt = request.contents[0].text().unwrap_or_default();
                request.model == "gemini-test"
                    && prompt.contains("query 'cats'")
                    && prompt.ends_with("---\nfirst\n---\nsecond\n---")
            })
            .times(1)
            .returning(|_| Ok(reply(Some("Cats nap."))));

        let summarizer = Summarizer::new(Arc::new(model)).with_model("gemini-test");
        let summary = summarizer
            .summarize(&["first".to_string(), "second".to_string()], "cats")
            .await
            .unwrap();
        assert_eq!(summary, "Cats nap.");
    }

    #[tokio::test]
    async fn test_missing_text_is_validation_error() {
        let mut model = MockModel::new();
        model.expect_generate_content().returning(|_| Ok(reply(None)));

        let summarizer = Summarizer::new(Arc::new(model));
        let err = summarizer
            .summarize(&["context".to_string()], "q")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
