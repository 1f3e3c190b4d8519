//! Deterministic provider for tests
//!
//! [`MockProvider`] never touches the network. Embeddings come from an
//! explicit text-to-vector table when one is registered, otherwise from a
//! hashed bag-of-words so texts sharing words land close to each other.
//! Every call is counted so tests can assert on provider traffic.

use crate::{
    Content, EmbeddingVector, Error, LLMRequest, LLMResponse, Result, TaskType,
    providers::{Capability, Provider, ProviderMetadata},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

const DEFAULT_DIMENSIONS: usize = 16;

/// In-process provider with predictable embeddings and summaries
pub struct MockProvider {
    dimensions: usize,
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    summary: RwLock<Option<String>>,
    embed_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    task_types: RwLock<Vec<TaskType>>,
    prompts: RwLock<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_DIMENSIONS)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            vectors: RwLock::new(HashMap::new()),
            summary: RwLock::new(Some("Test summary".to_string())),
            embed_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            task_types: RwLock::new(Vec::new()),
            prompts: RwLock::new(Vec::new()),
        }
    }

    /// Pin the embedding returned for an exact text
    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.set_vector(text, vector);
        self
    }

    /// Text returned by every generation call
    pub fn with_summary(self, summary: impl Into<String>) -> Self {
        self.set_summary(Some(summary.into()));
        self
    }

    /// Make generation calls return a response without any text
    pub fn without_summary(self) -> Self {
        self.set_summary(None);
        self
    }

    pub fn set_vector(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.vectors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(text.into(), vector);
    }

    pub fn set_summary(&self, summary: Option<String>) {
        *self.summary.write().unwrap_or_else(PoisonError::into_inner) = summary;
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Task types seen by `embed_content`, in call order
    pub fn task_types(&self) -> Vec<TaskType> {
        self.task_types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompt text of the most recent generation call
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn hashed_embedding(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = fnv1a(&token.to_lowercase()) as usize % self.dimensions;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x100000001b3)
    })
}

#[async_trait]
impl Provider for MockProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "mock".to_string(),
            display_name: "Mock Provider".to_string(),
            capabilities: vec![Capability::TextGeneration, Capability::Embedding],
            models: vec![],
        }
    }

    async fn generate_content(&self, request: LLMRequest) -> Result<LLMResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);

        let prompt = request
            .contents
            .iter()
            .filter_map(Content::text)
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt);

        let summary = self
            .summary
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        Ok(LLMResponse {
            content: summary.map(Content::new_model_text),
            finish_reason: Some("STOP".to_string()),
        })
    }

    async fn embed_content(&self, text: String, task_type: TaskType) -> Result<EmbeddingVector> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        self.task_types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task_type);

        let pinned = self
            .vectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&text)
            .cloned();

        let vector = pinned.unwrap_or_else(|| self.hashed_embedding(&text));
        if vector.is_empty() {
            return Err(Error::upstream("Missing embedding values"));
        }
        Ok(EmbeddingVector::new(vector))
    }

    fn embedding_dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }
}
