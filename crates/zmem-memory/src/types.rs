//! Request types for memory operations
//!
//! These double as tool parameter types: they deserialize from the JSON a
//! caller sends and derive the JSON schema advertised for each tool. An
//! omitted `collection_name` means the service's default collection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Results returned by the recall family unless asked otherwise
pub const DEFAULT_RECALL_TOP_K: usize = 3;
/// Memories fed into `summarize_memory` unless asked otherwise
pub const DEFAULT_SUMMARIZE_TOP_K: usize = 5;

fn default_recall_top_k() -> usize {
    DEFAULT_RECALL_TOP_K
}

fn default_summarize_top_k() -> usize {
    DEFAULT_SUMMARIZE_TOP_K
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AddMemoryRequest {
    /// Text to remember
    pub text: String,
    /// Id to store the memory under; an existing memory with this id is replaced
    #[serde(default)]
    pub doc_id: Option<String>,
    /// Extra fields (string, number or boolean values) stored alongside the text
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl AddMemoryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn in_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecallRequest {
    /// What to search for
    pub query: String,
    /// Maximum number of memories to return
    #[serde(default = "default_recall_top_k")]
    pub top_k: usize,
    /// Metadata filter, e.g. {"topic": "rust"} or {"year": {"$gte": 2020}}
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl RecallRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_RECALL_TOP_K,
            filter: None,
            collection_name: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn in_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HybridRecallRequest {
    /// What to search for
    pub query: String,
    /// Only return memories containing this text (case-insensitive)
    #[serde(default)]
    pub keyword: Option<String>,
    /// Maximum number of memories considered before keyword filtering
    #[serde(default = "default_recall_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl HybridRecallRequest {
    pub fn new(query: impl Into<String>, keyword: Option<String>) -> Self {
        Self {
            query: query.into(),
            keyword,
            top_k: DEFAULT_RECALL_TOP_K,
            filter: None,
            collection_name: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn in_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckMemoryRequest {
    /// Topic to look for
    pub topic: String,
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl CheckMemoryRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            filter: None,
            collection_name: None,
        }
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn in_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

/// Addresses a single memory
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemoryIdRequest {
    pub doc_id: String,
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl MemoryIdRequest {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            collection_name: None,
        }
    }

    pub fn in_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateMetadataRequest {
    pub doc_id: String,
    /// New metadata; replaces the existing fields. `original_text` is kept
    /// unless given here.
    pub metadata: Value,
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl UpdateMetadataRequest {
    pub fn new(doc_id: impl Into<String>, metadata: Value) -> Self {
        Self {
            doc_id: doc_id.into(),
            metadata,
            collection_name: None,
        }
    }

    pub fn in_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeMemoryRequest {
    /// Question the summary should answer
    pub query: String,
    /// Number of memories to summarize
    #[serde(default = "default_summarize_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl SummarizeMemoryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_SUMMARIZE_TOP_K,
            filter: None,
            collection_name: None,
        }
    }

    pub fn in_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeCollectionRequest {
    pub collection_name: String,
    /// Optional focus for the summary
    #[serde(default)]
    pub query: String,
}

impl SummarizeCollectionRequest {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            query: String::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }
}

/// Names a collection explicitly; there is no default
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CollectionRequest {
    pub collection_name: String,
}

impl CollectionRequest {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
        }
    }
}
