//! Request and result types shared by store implementations

use crate::filter::Filter;
use serde::{Deserialize, Serialize};

/// Flat metadata attached to a record
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A record as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl StoredRecord {
    pub fn new(id: impl Into<String>, embedding: Vec<f32>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            embedding,
            metadata,
        }
    }
}

/// Which parts of a record a read returns
///
/// Ids are always returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Include {
    pub metadatas: bool,
    pub embeddings: bool,
    pub distances: bool,
}

impl Include {
    /// Ids only
    pub fn none() -> Self {
        Self {
            metadatas: false,
            embeddings: false,
            distances: false,
        }
    }

    pub fn all() -> Self {
        Self {
            metadatas: true,
            embeddings: true,
            distances: true,
        }
    }

    pub fn metadatas() -> Self {
        Self {
            metadatas: true,
            ..Self::none()
        }
    }

    pub fn with_distances(mut self) -> Self {
        self.distances = true;
        self
    }
}

impl Default for Include {
    /// Metadata and distances, the parts a similarity search usually needs
    fn default() -> Self {
        Self::metadatas().with_distances()
    }
}

/// Similarity search
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub embedding: Vec<f32>,
    pub top_k: usize,
    pub filter: Option<Filter>,
    pub include: Include,
}

impl QueryRequest {
    pub fn new(embedding: Vec<f32>, top_k: usize) -> Self {
        Self {
            embedding,
            top_k,
            filter: None,
            include: Include::default(),
        }
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_include(mut self, include: Include) -> Self {
        self.include = include;
        self
    }
}

/// Direct read by id
#[derive(Debug, Clone)]
pub struct GetRequest {
    /// Restrict to these ids; `None` means every record
    pub ids: Option<Vec<String>>,
    pub include: Include,
}

impl GetRequest {
    pub fn all() -> Self {
        Self {
            ids: None,
            include: Include::metadatas(),
        }
    }

    pub fn by_ids(ids: Vec<String>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::all()
        }
    }

    pub fn with_include(mut self, include: Include) -> Self {
        self.include = include;
        self
    }
}

/// One record returned by a read; unrequested parts are `None`
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: String,
    pub metadata: Option<Metadata>,
    pub embedding: Option<Vec<f32>>,
    pub distance: Option<f32>,
}
