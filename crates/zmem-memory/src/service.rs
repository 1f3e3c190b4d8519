//! Memory operations
//!
//! [`MemoryService`] is the public contract of the memory layer. Every
//! operation validates its inputs before touching the store or the model
//! provider, and returns a plain [`Result`]; wrapping failures for callers is
//! left to whoever dispatches the operations.

use crate::embedder::Embedder;
use crate::gate::{PrivilegeGate, PrivilegeToken};
use crate::metadata::{self, MemoryMetadata, ORIGINAL_TEXT_KEY, original_text_of};
use crate::resolver::CollectionResolver;
use crate::retrieval::{self, Recalled, SearchOptions};
use crate::summarize::Summarizer;
use crate::types::*;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;
use zmem_core::{DEFAULT_COLLECTION_NAME, Error, Provider, Result, TaskType};
use zmem_store::{Filter, GetRequest, Include, StoredRecord, VectorStore};

/// Agent-facing semantic memory
pub struct MemoryService {
    resolver: CollectionResolver,
    embedder: Embedder,
    summarizer: Summarizer,
    gate: PrivilegeGate,
    default_collection: String,
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(message));
    }
    Ok(())
}

fn require_top_k(top_k: usize) -> Result<()> {
    if top_k == 0 {
        return Err(Error::validation("top_k must be at least 1."));
    }
    Ok(())
}

impl MemoryService {
    pub fn new(store: Arc<dyn VectorStore>, provider: Arc<dyn Provider>) -> Self {
        Self {
            resolver: CollectionResolver::new(store),
            embedder: Embedder::new(provider.clone()),
            summarizer: Summarizer::new(provider),
            gate: PrivilegeGate::new(),
            default_collection: DEFAULT_COLLECTION_NAME.to_string(),
        }
    }

    /// Collection used when a request does not name one
    pub fn with_default_collection(mut self, name: impl Into<String>) -> Self {
        self.default_collection = name.into();
        self
    }

    /// Generation model used for summaries
    pub fn with_summary_model(mut self, model: impl Into<String>) -> Self {
        self.summarizer = self.summarizer.with_model(model);
        self
    }

    pub fn default_collection(&self) -> &str {
        &self.default_collection
    }

    pub fn gate(&self) -> &PrivilegeGate {
        &self.gate
    }

    fn collection_name(&self, requested: Option<String>) -> Result<String> {
        match requested {
            Some(name) => {
                require(&name, "Collection name cannot be empty.")?;
                Ok(name)
            }
            None => Ok(self.default_collection.clone()),
        }
    }

    /// Store `text` and return its id, replacing any memory with the same id
    pub async fn add(&self, request: AddMemoryRequest) -> Result<String> {
        let collection_name = self.collection_name(request.collection_name)?;
        tracing::debug!(collection = %collection_name, "Executing add_memory");

        require(&request.text, "Text content cannot be empty.")?;
        let fields = metadata::fields_from(request.metadata)?;
        let record_metadata = MemoryMetadata::new(request.text.clone()).with_fields(fields)?;

        let doc_id = request
            .doc_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        tracing::debug!(doc_id = %doc_id, "Using doc_id");

        let collection = self.resolver.resolve(&collection_name).await?;
        let embedding = self
            .embedder
            .embed(&request.text, TaskType::RetrievalDocument)
            .await?;

        collection
            .upsert(vec![StoredRecord::new(
                doc_id.clone(),
                embedding,
                record_metadata.into_map(),
            )])
            .await?;

        tracing::info!(
            collection = %collection_name,
            doc_id = %doc_id,
            "Successfully added/updated document"
        );
        Ok(doc_id)
    }

    async fn search(
        &self,
        query: &str,
        collection_name: Option<String>,
        filter: Option<&Value>,
        options: SearchOptions,
    ) -> Result<Vec<Recalled>> {
        let collection_name = self.collection_name(collection_name)?;
        require(query, "Query cannot be empty.")?;
        require_top_k(options.top_k)?;
        let filter = Filter::optional(filter)?;

        let collection = self.resolver.resolve(&collection_name).await?;
        let query_vector = self.embedder.embed(query, TaskType::RetrievalQuery).await?;

        let recalled =
            retrieval::search(collection.as_ref(), query_vector, options.with_filter(filter))
                .await?;

        tracing::info!(
            collection = %collection_name,
            count = recalled.len(),
            "Retrieved relevant text chunks"
        );
        Ok(recalled)
    }

    /// Texts of the memories closest to the query
    pub async fn recall(&self, request: RecallRequest) -> Result<Vec<String>> {
        tracing::debug!("Executing recall_memory");
        let recalled = self
            .search(
                &request.query,
                request.collection_name,
                request.filter.as_ref(),
                SearchOptions::new(request.top_k),
            )
            .await?;

        Ok(recalled.into_iter().map(|r| r.text).collect())
    }

    /// Like [`recall`](Self::recall), paired with each memory's distance
    pub async fn recall_with_distance(&self, request: RecallRequest) -> Result<Vec<(String, f32)>> {
        tracing::debug!("Executing recall_memory_with_distance");
        let recalled = self
            .search(
                &request.query,
                request.collection_name,
                request.filter.as_ref(),
                SearchOptions::new(request.top_k).with_distance(),
            )
            .await?;

        Ok(recalled
            .into_iter()
            .filter_map(|r| r.distance.map(|d| (r.text, d)))
            .collect())
    }

    /// Vector recall narrowed to texts containing the keyword
    pub async fn recall_hybrid(&self, request: HybridRecallRequest) -> Result<Vec<String>> {
        tracing::debug!("Executing recall_memory_hybrid");
        let recalled = self
            .search(
                &request.query,
                request.collection_name,
                request.filter.as_ref(),
                SearchOptions::new(request.top_k).with_keyword(request.keyword),
            )
            .await?;

        Ok(recalled.into_iter().map(|r| r.text).collect())
    }

    /// Whether any memory relates to the topic
    pub async fn check(&self, request: CheckMemoryRequest) -> Result<bool> {
        let collection_name = self.collection_name(request.collection_name)?;
        tracing::debug!(collection = %collection_name, "Executing check_memory");

        require(&request.topic, "Topic cannot be empty.")?;
        let filter = Filter::optional(request.filter.as_ref())?;

        let collection = self.resolver.resolve(&collection_name).await?;
        let query_vector = self
            .embedder
            .embed(&request.topic, TaskType::RetrievalQuery)
            .await?;

        let exists = retrieval::exists(collection.as_ref(), query_vector, filter).await?;
        tracing::info!(
            collection = %collection_name,
            topic = %request.topic,
            exists,
            "Check memory result"
        );
        Ok(exists)
    }

    /// Remove a memory. Succeeds whether or not the id exists.
    pub async fn delete(&self, request: MemoryIdRequest) -> Result<bool> {
        let collection_name = self.collection_name(request.collection_name)?;
        tracing::debug!(collection = %collection_name, doc_id = %request.doc_id, "Executing delete_memory");

        require(&request.doc_id, "doc_id cannot be empty.")?;

        let collection = self.resolver.resolve(&collection_name).await?;
        collection.delete(std::slice::from_ref(&request.doc_id)).await?;

        tracing::info!(
            collection = %collection_name,
            doc_id = %request.doc_id,
            "Attempted deletion of document"
        );
        Ok(true)
    }

    /// Replace a memory's metadata, keeping its embedding
    pub async fn update_metadata(&self, request: UpdateMetadataRequest) -> Result<bool> {
        let collection_name = self.collection_name(request.collection_name)?;
        tracing::debug!(collection = %collection_name, doc_id = %request.doc_id, "Executing update_memory_metadata");

        require(&request.doc_id, "doc_id cannot be empty.")?;
        let fields = match request.metadata {
            Value::Object(map) if !map.is_empty() => map,
            _ => {
                return Err(Error::validation(
                    "Metadata must be a non-empty dictionary.",
                ));
            }
        };
        metadata::validate_fields(&fields)?;

        let collection = self.resolver.resolve(&collection_name).await?;
        let existing = collection
            .get(GetRequest::by_ids(vec![request.doc_id.clone()]))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::not_found(format!(
                    "Document with id '{}' not found in collection '{}'.",
                    request.doc_id, collection_name
                ))
            })?;

        let kept_text = if fields.contains_key(ORIGINAL_TEXT_KEY) {
            None
        } else {
            original_text_of(existing.metadata.as_ref())
        };
        let new_metadata = match kept_text {
            Some(text) => MemoryMetadata::new(text).with_fields(fields)?.into_map(),
            None => fields,
        };

        collection
            .update(&request.doc_id, None, Some(new_metadata))
            .await?;

        tracing::info!(
            collection = %collection_name,
            doc_id = %request.doc_id,
            "Successfully updated metadata for document"
        );
        Ok(true)
    }

    /// Stored text of a memory, or an empty string when there is none
    pub async fn get_by_id(&self, request: MemoryIdRequest) -> Result<String> {
        let collection_name = self.collection_name(request.collection_name)?;
        tracing::debug!(collection = %collection_name, doc_id = %request.doc_id, "Executing get_memory_by_id");

        require(&request.doc_id, "doc_id cannot be empty.")?;

        let collection = self.resolver.resolve(&collection_name).await?;
        let found = collection
            .get(GetRequest::by_ids(vec![request.doc_id.clone()]))
            .await?
            .into_iter()
            .next();

        let Some(found) = found else {
            tracing::warn!(
                collection = %collection_name,
                doc_id = %request.doc_id,
                "Document not found"
            );
            return Ok(String::new());
        };

        match original_text_of(found.metadata.as_ref()) {
            Some(text) => Ok(text),
            None => {
                tracing::warn!(
                    collection = %collection_name,
                    doc_id = %request.doc_id,
                    "No text content found for document"
                );
                Ok(String::new())
            }
        }
    }

    /// Summary of the memories most relevant to the query
    ///
    /// Returns an empty string when nothing relevant is stored.
    pub async fn summarize_memory(&self, request: SummarizeMemoryRequest) -> Result<String> {
        tracing::debug!("Executing summarize_memory");
        let collection_label = request
            .collection_name
            .clone()
            .unwrap_or_else(|| self.default_collection.clone());

        let texts: Vec<String> = self
            .search(
                &request.query,
                request.collection_name,
                request.filter.as_ref(),
                SearchOptions::new(request.top_k),
            )
            .await?
            .into_iter()
            .map(|r| r.text)
            .collect();

        if texts.is_empty() {
            tracing::warn!(collection = %collection_label, "No context found for summarization query");
            return Ok(String::new());
        }

        let summary = self.summarizer.summarize(&texts, &request.query).await?;
        tracing::info!(collection = %collection_label, "Generated summary for query");
        Ok(summary)
    }

    /// Summary of every memory in a collection, in store order
    pub async fn summarize_collection(&self, request: SummarizeCollectionRequest) -> Result<String> {
        tracing::debug!(collection = %request.collection_name, "Executing summarize_collection");
        require(&request.collection_name, "Collection name cannot be empty.")?;

        let collection = self.resolver.resolve(&request.collection_name).await?;
        let texts: Vec<String> = collection
            .get(GetRequest::all())
            .await?
            .iter()
            .filter_map(|m| original_text_of(m.metadata.as_ref()))
            .collect();

        if texts.is_empty() {
            tracing::warn!(
                collection = %request.collection_name,
                "No text content found in collection for summarization"
            );
            return Ok(String::new());
        }

        let summary = self.summarizer.summarize(&texts, &request.query).await?;
        tracing::info!(collection = %request.collection_name, "Generated summary for collection");
        Ok(summary)
    }

    /// Ids of every memory in a collection
    pub async fn list_collection_ids(&self, request: CollectionRequest) -> Result<Vec<String>> {
        tracing::debug!(collection = %request.collection_name, "Executing list_collection_ids");
        require(&request.collection_name, "Collection name cannot be empty.")?;

        let collection = self.resolver.resolve(&request.collection_name).await?;
        let ids: Vec<String> = collection
            .get(GetRequest::all().with_include(Include::none()))
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        if ids.is_empty() {
            tracing::warn!(collection = %request.collection_name, "No documents found in collection");
        } else {
            tracing::info!(collection = %request.collection_name, count = ids.len(), "Retrieved document IDs");
        }
        Ok(ids)
    }

    /// Destroy a collection and everything in it. Privileged.
    pub async fn delete_collection(&self, request: CollectionRequest) -> Result<bool> {
        tracing::debug!(collection = %request.collection_name, "Executing delete_collection");
        require(&request.collection_name, "Collection name cannot be empty.")?;

        let token = self.gate.consume("delete_collection")?;
        self.drop_collection(token, &request.collection_name).await
    }

    async fn drop_collection(&self, _token: PrivilegeToken, name: &str) -> Result<bool> {
        self.resolver.store().delete_collection(name).await?;
        tracing::info!(collection = %name, "Deleted collection");
        Ok(true)
    }

    /// Names of all collections, sorted. Privileged.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        tracing::debug!("Executing list_collections");
        let token = self.gate.consume("list_collections")?;
        self.collection_names(token).await
    }

    async fn collection_names(&self, _token: PrivilegeToken) -> Result<Vec<String>> {
        let mut names = self.resolver.store().list_collections().await?;
        names.sort();
        Ok(names)
    }

    /// Allow the next privileged operation
    pub fn grant_privilege(&self) -> bool {
        self.gate.grant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use zmem_core::ErrorKind;
    use zmem_core::testing::MockProvider;
    use zmem_store::LocalVectorStore;

    fn service() -> (MemoryService, Arc<MockProvider>, Arc<LocalVectorStore>) {
        let store = Arc::new(LocalVectorStore::in_memory());
        let provider = Arc::new(
            MockProvider::new()
                .with_vector("apple pie", vec![1.0, 0.0])
                .with_vector("banana bread", vec![0.0, 1.0])
                .with_vector("apple", vec![0.9, 0.1]),
        );
        let service = MemoryService::new(store.clone(), provider.clone());
        (service, provider, store)
    }

    #[tokio::test]
    async fn test_add_generates_hex_id() {
        let (service, provider, _) = service();

        let id = service.add(AddMemoryRequest::new("apple pie")).await.unwrap();

        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(provider.task_types(), vec![TaskType::RetrievalDocument]);
        assert_eq!(
            service.get_by_id(MemoryIdRequest::new(&id)).await.unwrap(),
            "apple pie"
        );
    }

    #[tokio::test]
    async fn test_empty_doc_id_is_generated() {
        let (service, _, _) = service();
        let id = service
            .add(AddMemoryRequest::new("apple pie").with_id(""))
            .await
            .unwrap();
        assert_eq!(id.len(), 32);
    }

    #[tokio::test]
    async fn test_validation_precedes_side_effects() {
        let (service, provider, store) = service();

        let err = service.add(AddMemoryRequest::new("  ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .add(AddMemoryRequest::new("apple pie").with_metadata(json!({"tags": ["x"]})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .recall(RecallRequest::new("apple").with_top_k(0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .recall(RecallRequest::new("apple").with_filter(json!({"$bogus": 1})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert_eq!(provider.embed_calls(), 0);
        assert!(store.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recall_uses_query_intent() {
        let (service, provider, _) = service();
        service.add(AddMemoryRequest::new("apple pie")).await.unwrap();
        service.add(AddMemoryRequest::new("banana bread")).await.unwrap();

        let texts = service
            .recall(RecallRequest::new("apple").with_top_k(1))
            .await
            .unwrap();

        assert_eq!(texts, vec!["apple pie"]);
        assert_eq!(provider.task_types().last(), Some(&TaskType::RetrievalQuery));
    }

    #[tokio::test]
    async fn test_update_metadata_keeps_text_and_embedding() {
        let (service, _, _) = service();
        service
            .add(AddMemoryRequest::new("apple pie").with_id("pie"))
            .await
            .unwrap();

        let before = service
            .recall_with_distance(RecallRequest::new("apple"))
            .await
            .unwrap();

        service
            .update_metadata(UpdateMetadataRequest::new("pie", json!({"rating": 5})))
            .await
            .unwrap();

        let after = service
            .recall_with_distance(RecallRequest::new("apple"))
            .await
            .unwrap();
        assert_eq!(before, after);
        assert_eq!(
            service.get_by_id(MemoryIdRequest::new("pie")).await.unwrap(),
            "apple pie"
        );

        let filtered = service
            .recall(RecallRequest::new("apple").with_filter(json!({"rating": 5})))
            .await
            .unwrap();
        assert_eq!(filtered, vec!["apple pie"]);
    }

    #[tokio::test]
    async fn test_update_metadata_errors() {
        let (service, _, _) = service();

        let err = service
            .update_metadata(UpdateMetadataRequest::new("missing", json!({"a": 1})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = service
            .update_metadata(UpdateMetadataRequest::new("missing", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_summarize_memory_without_context() {
        let (service, provider, _) = service();

        let summary = service
            .summarize_memory(SummarizeMemoryRequest::new("apple"))
            .await
            .unwrap();

        assert_eq!(summary, "");
        assert_eq!(provider.generate_calls(), 0);
    }

    #[tokio::test]
    async fn test_summarize_collection_joins_all_texts() {
        let (service, provider, _) = service();
        service
            .add(AddMemoryRequest::new("apple pie").in_collection("food"))
            .await
            .unwrap();
        service
            .add(AddMemoryRequest::new("banana bread").in_collection("food"))
            .await
            .unwrap();

        let summary = service
            .summarize_collection(SummarizeCollectionRequest::new("food").with_query("baking"))
            .await
            .unwrap();

        assert_eq!(summary, "Test summary");
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("query 'baking'"));
        assert!(prompt.contains("apple pie\n---\nbanana bread"));
    }

    #[tokio::test]
    async fn test_default_collection_override() {
        let (service, _, store) = service();
        let service = service.with_default_collection("scratch");

        service.add(AddMemoryRequest::new("apple pie")).await.unwrap();
        assert_eq!(store.list_collections().await.unwrap(), vec!["scratch"]);
        assert_eq!(service.default_collection(), "scratch");
    }

    #[tokio::test]
    async fn test_privileged_operations_consume_grant() {
        let (service, _, _) = service();
        service
            .add(AddMemoryRequest::new("apple pie").in_collection("b"))
            .await
            .unwrap();
        service
            .add(AddMemoryRequest::new("apple pie").in_collection("a"))
            .await
            .unwrap();

        let err = service.list_collections().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Privilege);

        assert!(service.grant_privilege());
        assert_eq!(service.list_collections().await.unwrap(), vec!["a", "b"]);
        assert!(!service.gate().is_granted());
    }

    #[tokio::test]
    async fn test_delete_absent_collection_still_consumes_grant() {
        let (service, _, _) = service();
        service.grant_privilege();

        let err = service
            .delete_collection(CollectionRequest::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!service.gate().is_granted());
    }

    #[tokio::test]
    async fn test_delete_collection_validates_before_consuming() {
        let (service, _, _) = service();
        service.grant_privilege();

        let err = service
            .delete_collection(CollectionRequest::new(""))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(service.gate().is_granted());
    }

    #[tokio::test]
    async fn test_list_collection_ids() {
        let (service, _, _) = service();
        assert!(
            service
                .list_collection_ids(CollectionRequest::new("fresh"))
                .await
                .unwrap()
                .is_empty()
        );

        service
            .add(AddMemoryRequest::new("apple pie").with_id("one").in_collection("fresh"))
            .await
            .unwrap();
        service
            .add(AddMemoryRequest::new("banana bread").with_id("two").in_collection("fresh"))
            .await
            .unwrap();

        assert_eq!(
            service
                .list_collection_ids(CollectionRequest::new("fresh"))
                .await
                .unwrap(),
            vec!["one", "two"]
        );
    }
}
