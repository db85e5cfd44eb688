use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use crate::core::error::Result;
use crate::core::types::DocId;
use crate::index::index_store::IndexStore;
use crate::query::ast::Query;
use crate::query::matcher::DocumentMatcher;
use crate::search::results::SearchHit;
use crate::storage::document_store::DocumentStore;

/// Resolves parsed queries against the index and the document store
pub struct QueryExecutor {
    pub documents: Arc<DocumentStore>,
    pub index: Arc<IndexStore>,
    pub matcher: DocumentMatcher,
}

impl QueryExecutor {
    pub fn new(documents: Arc<DocumentStore>, index: Arc<IndexStore>) -> Self {
        QueryExecutor {
            documents,
            index,
            matcher: DocumentMatcher::new(),
        }
    }

    /// Index-assisted search. Every candidate is re-verified against the
    /// live document, which is what enforces `<` and `>` clauses.
    pub fn execute(&self, query: &Query) -> Result<Vec<SearchHit>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.candidates(query);
        debug!(clauses = query.len(), candidates = candidates.len(), "probed index");

        let verified = candidates
            .into_par_iter()
            .map(|id| self.verify(query, id))
            .collect::<Result<Vec<_>>>()?;

        Ok(verified.into_iter().flatten().collect())
    }

    /// Ids present under the index key of every clause.
    fn candidates(&self, query: &Query) -> Vec<DocId> {
        let mut counts: HashMap<DocId, usize> = HashMap::new();
        for clause in query.iter() {
            for id in self.index.lookup(&clause.index_key()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        let required = query.len();
        counts
            .into_iter()
            .filter(|(_, count)| *count == required)
            .map(|(id, _)| id)
            .collect()
    }

    fn verify(&self, query: &Query, id: DocId) -> Result<Option<SearchHit>> {
        let document = match self.documents.get(&id) {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                debug!(%id, "dropping index entry for expired document");
                return Ok(None);
            }
            Err(e) => {
                error!(%id, error = %e, "failed to load candidate document");
                return Err(e);
            }
        };

        if self.matcher.matches(query, &document) {
            Ok(Some(SearchHit { id, document }))
        } else {
            Ok(None)
        }
    }

    /// Index-free search over every stored document. Same results as
    /// `execute` for documents whose index entries are live.
    pub fn scan(&self, query: &Query) -> Result<Vec<SearchHit>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self
            .documents
            .get_all()?
            .into_iter()
            .filter(|(_, document)| self.matcher.matches(query, document))
            .map(|(id, document)| SearchHit { id, document })
            .collect();
        Ok(hits)
    }
}
