//! Embedding adapter over the model provider

use std::sync::Arc;
use zmem_core::{Error, Provider, Result, TaskType};

pub struct Embedder {
    provider: Arc<dyn Provider>,
}

impl Embedder {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Embed `text` for the given use. One provider call, no caching.
    pub async fn embed(&self, text: &str, task_type: TaskType) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            tracing::error!("Invalid text input for embedding");
            return Err(Error::validation("Invalid text provided for embedding."));
        }

        let embedding = self
            .provider
            .embed_content(text.to_string(), task_type)
            .await?;

        if embedding.is_empty() {
            tracing::error!(task_type = %task_type, "Provider returned an empty embedding");
            return Err(Error::upstream(format!(
                "Provider failed to return embedding for task '{}'.",
                task_type
            )));
        }

        Ok(embedding.vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;
    use zmem_core::{EmbeddingVector, ErrorKind, LLMRequest, LLMResponse, ProviderMetadata};

    mock! {
        pub Model {}

        #[async_trait]
        impl Provider for Model {
            fn metadata(&self) -> ProviderMetadata;
            async fn generate_content(&self, request: LLMRequest) -> Result<LLMResponse>;
            async fn embed_content(&self, text: String, task_type: TaskType) -> Result<EmbeddingVector>;
        }
    }

    #[tokio::test]
    async fn test_embed_forwards_task_type() {
        let mut model = MockModel::new();
        model
            .expect_embed_content()
            .with(eq("hello".to_string()), eq(TaskType::RetrievalQuery))
            .times(1)
            .returning(|_, _| Ok(EmbeddingVector::new(vec![0.5, 0.5])));

        let embedder = Embedder::new(Arc::new(model));
        let vector = embedder.embed("hello", TaskType::RetrievalQuery).await.unwrap();
        assert_eq!(vector, vec![0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_blank_text_never_reaches_provider() {
        let mut model = MockModel::new();
        model.expect_embed_content().times(0);

        let embedder = Embedder::new(Arc::new(model));
        let err = embedder
            .embed(" \n\t", TaskType::RetrievalDocument)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_empty_vector_is_upstream_error() {
        let mut model = MockModel::new();
        model
            .expect_embed_content()
            .returning(|_, _| Ok(EmbeddingVector::new(vec![])));

        let embedder = Embedder::new(Arc::new(model));
        let err = embedder
            .embed("text", TaskType::RetrievalDocument)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let mut model = MockModel::new();
        model
            .expect_embed_content()
            .returning(|_, _| Err(zmem_core::Error::upstream("quota exceeded")));

        let embedder = Embedder::new(Arc::new(model));
        let err = embedder
            .embed("text", TaskType::RetrievalDocument)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.to_string().contains("quota exceeded"));
    }
}
