//! Tests for the provider system

#[cfg(test)]
mod tests {
    use crate::{
        Error, ErrorKind, LLMRequest, TaskType, ZConfig, ZConfigExt,
        providers::{Capability, GeminiProvider, Provider, ProviderMetadata},
    };
    use async_trait::async_trait;

    struct EmbedOnly;

    #[async_trait]
    impl Provider for EmbedOnly {
        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "embed-only".to_string(),
                display_name: "Embed Only".to_string(),
                capabilities: vec![Capability::Embedding],
                models: vec![],
            }
        }
    }

    #[test]
    fn test_gemini_metadata() {
        let metadata = GeminiProvider::static_metadata();

        assert_eq!(metadata.name, "gemini");
        assert_eq!(metadata.display_name, "Google Gemini");
        assert!(metadata.capabilities.contains(&Capability::TextGeneration));
        assert!(metadata.capabilities.contains(&Capability::Embedding));
        assert!(metadata.models.iter().any(|m| m.id == "embedding-001"));
    }

    #[test]
    fn test_supports_uses_metadata() {
        let provider = EmbedOnly;
        assert!(provider.supports(Capability::Embedding));
        assert!(!provider.supports(Capability::TextGeneration));
        assert_eq!(provider.embedding_dimensions(), None);
    }

    #[tokio::test]
    async fn test_unsupported_capability_errors() {
        let provider = EmbedOnly;

        let err = provider
            .generate_content(LLMRequest::from_prompt("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.to_string().contains("text generation"));

        let err = provider
            .embed_content("hi".to_string(), TaskType::Unspecified)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.to_string().contains("embedding"));
    }

    #[test]
    fn test_create_provider_from_config() {
        let config = ZConfig::test_defaults();
        let provider = config.create_provider().unwrap();

        assert_eq!(provider.metadata().name, "gemini");
        assert_eq!(provider.embedding_dimensions(), Some(768));
    }

    #[test]
    fn test_create_provider_without_key_fails() {
        let config = ZConfig::default();
        let result = config.create_provider();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
