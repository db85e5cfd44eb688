use serde::{Deserialize, Serialize};

use crate::core::types::{DocId, Document};

/// A document satisfying a query, with its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocId,
    pub document: Document,
}

/// Search results container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
    pub count: usize,
}

impl SearchResults {
    pub fn new(results: Vec<SearchHit>) -> Self {
        let count = results.len();
        SearchResults { results, count }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocId> {
        self.results.iter().map(|hit| &hit.id)
    }

    /// Hit order is unspecified; sort when a stable presentation is needed.
    pub fn sort_by_id(&mut self) {
        self.results.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

impl From<Vec<SearchHit>> for SearchResults {
    fn from(results: Vec<SearchHit>) -> Self {
        SearchResults::new(results)
    }
}
