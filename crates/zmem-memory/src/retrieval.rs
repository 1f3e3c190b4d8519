//! Retrieval over a collection
//!
//! Ranking belongs to the store: results come back closest first and are
//! never re-ordered here. This module maps hits to their stored text and
//! applies the keyword post-filter.

use crate::metadata::original_text_of;
use zmem_core::Result;
use zmem_store::{Collection, Filter, Include, QueryRequest};

/// How a search is scoped and what it returns
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub top_k: usize,
    pub filter: Option<Filter>,
    /// Case-insensitive substring every returned text must contain
    pub keyword: Option<String>,
    pub with_distance: bool,
}

impl SearchOptions {
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            filter: None,
            keyword: None,
            with_distance: false,
        }
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    /// An empty keyword counts as no keyword
    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword.filter(|k| !k.is_empty());
        self
    }

    pub fn with_distance(mut self) -> Self {
        self.with_distance = true;
        self
    }
}

/// A retrieved memory
#[derive(Debug, Clone, PartialEq)]
pub struct Recalled {
    pub text: String,
    pub distance: Option<f32>,
}

/// Nearest memories to `query_vector`, closest first
pub async fn search(
    collection: &dyn Collection,
    query_vector: Vec<f32>,
    options: SearchOptions,
) -> Result<Vec<Recalled>> {
    let include = if options.with_distance {
        Include::metadatas().with_distances()
    } else {
        Include::metadatas()
    };

    let request = QueryRequest::new(query_vector, options.top_k)
        .with_filter(options.filter)
        .with_include(include);

    let matches = collection.query(request).await?;
    let hits = matches.len();
    let needle = options.keyword.map(|k| k.to_lowercase());

    let recalled: Vec<Recalled> = matches
        .into_iter()
        .filter_map(|m| {
            let text = original_text_of(m.metadata.as_ref())?;
            Some(Recalled {
                text,
                distance: m.distance,
            })
        })
        .filter(|r| {
            needle
                .as_ref()
                .is_none_or(|needle| r.text.to_lowercase().contains(needle))
        })
        .collect();

    tracing::debug!(
        collection = %collection.name(),
        hits,
        returned = recalled.len(),
        "Search complete"
    );

    Ok(recalled)
}

/// Whether at least one record matches, without reading any record content
pub async fn exists(
    collection: &dyn Collection,
    query_vector: Vec<f32>,
    filter: Option<Filter>,
) -> Result<bool> {
    let request = QueryRequest::new(query_vector, 1)
        .with_filter(filter)
        .with_include(Include::none());

    Ok(!collection.query(request).await?.is_empty())
}
