//! Capability type definitions for the provider system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Embedding vector result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingVector {
    /// The embedding vector values
    pub vector: Vec<f32>,
    /// Number of dimensions in the vector
    pub dimensions: usize,
}

impl EmbeddingVector {
    /// Create a new embedding vector
    pub fn new(vector: Vec<f32>) -> Self {
        let dimensions = vector.len();
        Self { vector, dimensions }
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }
}

/// Intended use of an embedding, forwarded to the model as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// Text being stored for later retrieval
    RetrievalDocument,
    /// Text used to search stored documents
    RetrievalQuery,
    SemanticSimilarity,
    Classification,
    Clustering,
    /// Let the model pick its default behavior
    #[serde(rename = "TASK_TYPE_UNSPECIFIED")]
    Unspecified,
}

impl TaskType {
    /// Wire name understood by the embedding API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            TaskType::RetrievalQuery => "RETRIEVAL_QUERY",
            TaskType::SemanticSimilarity => "SEMANTIC_SIMILARITY",
            TaskType::Classification => "CLASSIFICATION",
            TaskType::Clustering => "CLUSTERING",
            TaskType::Unspecified => "TASK_TYPE_UNSPECIFIED",
        }
    }

    /// Parse a usage hint.
    ///
    /// Unknown hints are accepted: a warning is logged and the model default
    /// ([`TaskType::Unspecified`]) is used instead.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_uppercase().as_str() {
            "RETRIEVAL_DOCUMENT" => TaskType::RetrievalDocument,
            "RETRIEVAL_QUERY" => TaskType::RetrievalQuery,
            "SEMANTIC_SIMILARITY" => TaskType::SemanticSimilarity,
            "CLASSIFICATION" => TaskType::Classification,
            "CLUSTERING" => TaskType::Clustering,
            "TASK_TYPE_UNSPECIFIED" => TaskType::Unspecified,
            _ => {
                tracing::warn!(task_type = %hint, "Unknown task_type, using default");
                TaskType::Unspecified
            }
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_vector() {
        let vector = vec![0.1, 0.2, 0.3];
        let embedding = EmbeddingVector::new(vector.clone());

        assert_eq!(embedding.dimensions, 3);
        assert_eq!(embedding.vector, vector);
        assert!(!embedding.is_empty());
    }

    #[test]
    fn test_task_type_from_hint() {
        assert_eq!(
            TaskType::from_hint("RETRIEVAL_DOCUMENT"),
            TaskType::RetrievalDocument
        );
        assert_eq!(TaskType::from_hint("retrieval_query"), TaskType::RetrievalQuery);
        assert_eq!(TaskType::from_hint("clustering"), TaskType::Clustering);
    }

    #[test]
    fn test_unknown_task_type_falls_back() {
        assert_eq!(TaskType::from_hint("SUMMARIZATION"), TaskType::Unspecified);
        assert_eq!(TaskType::from_hint(""), TaskType::Unspecified);
    }

    #[test]
    fn test_task_type_serializes_to_wire_name() {
        let json = serde_json::to_string(&TaskType::SemanticSimilarity).unwrap();
        assert_eq!(json, "\"SEMANTIC_SIMILARITY\"");
        let json = serde_json::to_string(&TaskType::Unspecified).unwrap();
        assert_eq!(json, "\"TASK_TYPE_UNSPECIFIED\"");
    }
}
