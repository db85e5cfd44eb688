use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::{DocId, Document};
use crate::index::flatten::flatten;
use crate::index::index_store::IndexStore;
use crate::query::parser::QueryParser;
use crate::search::executor::QueryExecutor;
use crate::search::results::{SearchHit, SearchResults};
use crate::storage::document_store::DocumentStore;

/// In-memory document store with a path index and a small query language.
///
/// `add` writes the document first and its index entries second. A concurrent
/// `search` may see the document before its index entries; once `add` has
/// returned both are visible.
pub struct Database {
    config: Config,

    documents: Arc<DocumentStore>,
    index: Arc<IndexStore>,

    query_parser: QueryParser,
    query_executor: QueryExecutor,
}

impl Database {
    pub fn new(config: Config) -> Self {
        let documents = Arc::new(DocumentStore::new(config.document_ttl, config.cleanup_interval));
        let index = Arc::new(IndexStore::new(config.index_ttl, config.cleanup_interval));
        let query_executor = QueryExecutor::new(documents.clone(), index.clone());

        Database {
            config,
            documents,
            index,
            query_parser: QueryParser::new(),
            query_executor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store a document and index its scalar leaves.
    pub fn add(&self, doc: Document) -> Result<DocId> {
        let keys = flatten(&doc);
        let id = self.documents.add(&doc)?;
        self.index.record_keys(&id, keys.iter());
        debug!(%id, keys = keys.len(), "added document");
        Ok(id)
    }

    /// Decode a JSON object and store it. Non-object roots are `InvalidInput`.
    pub fn add_json(&self, json: JsonValue) -> Result<DocId> {
        self.add(Document::from_json(json)?)
    }

    pub fn get(&self, id: &str) -> Result<Document> {
        self.documents.get(&DocId::from(id))
    }

    /// Parse `query_str` and return every live document satisfying all of
    /// its clauses. Order is unspecified.
    pub fn search(&self, query_str: &str) -> Result<Vec<SearchHit>> {
        let query = self.query_parser.parse(query_str)?;
        self.query_executor.execute(&query)
    }

    /// `search` wrapped in the `{results, count}` envelope.
    pub fn search_results(&self, query_str: &str) -> Result<SearchResults> {
        self.search(query_str).map(SearchResults::new)
    }

    /// Same as `search` but ignores the index and checks every document.
    pub fn scan(&self, query_str: &str) -> Result<Vec<SearchHit>> {
        let query = self.query_parser.parse(query_str)?;
        self.query_executor.scan(&query)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Drop expired documents and index entries now instead of waiting for
    /// the janitor. Returns how many entries were removed.
    pub fn purge_expired(&self) -> usize {
        self.documents.purge_expired() + self.index.purge_expired()
    }
}

impl Default for Database {
    fn default() -> Self {
        Database::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    fn db() -> Database {
        Database::new(Config::no_expiry())
    }

    #[test]
    fn test_add_get() {
        let db = db();
        let doc = Document::from_json(json!({"a": {"b": 1}})).unwrap();
        let id = db.add(doc.clone()).unwrap();

        assert_eq!(db.get(id.as_str()).unwrap(), doc);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_add_json_rejects_non_object() {
        let err = db().add_json(json!("just a string")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_search_invalid_query() {
        let err = db().search("a:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidQuery);
    }

    #[test]
    fn test_search_results_envelope() {
        let db = db();
        db.add_json(json!({"a": 1})).unwrap();
        db.add_json(json!({"a": 1, "b": 2})).unwrap();

        let results = db.search_results("a:1").unwrap();
        assert_eq!(results.count, 2);
        assert!(db.search_results("b:3").unwrap().is_empty());
    }

    #[test]
    fn test_failed_add_leaves_no_index_entries() {
        let db = db();
        let err = db.add(Document::new().with_field("x", f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(db.index.is_empty());
    }

    #[test]
    fn test_default_config() {
        let db = Database::default();
        assert_eq!(db.config(), &Config::default());
        assert!(db.is_empty());
    }
}
