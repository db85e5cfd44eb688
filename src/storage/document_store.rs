use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, warn};

use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Document};
use crate::storage::cache::ExpiringCache;

/// Append-only, id-keyed store of JSON-serialized documents.
pub struct DocumentStore {
    documents: ExpiringCache<DocId, Vec<u8>>,
}

impl DocumentStore {
    pub fn new(ttl: Option<Duration>, cleanup_interval: Option<Duration>) -> Self {
        DocumentStore {
            documents: ExpiringCache::new(ttl, cleanup_interval),
        }
    }

    /// Serialize and store `doc` under a freshly generated id.
    pub fn add(&self, doc: &Document) -> Result<DocId> {
        if !doc.is_finite() {
            error!("refusing to store document with a non-finite number");
            return Err(Error::internal("document contains a non-finite number"));
        }
        let bytes = serde_json::to_vec(doc).map_err(|e| {
            error!(error = %e, "failed to serialize document");
            Error::from(e)
        })?;

        let id = DocId::generate();
        self.documents.set(id.clone(), bytes);
        Ok(id)
    }

    pub fn get(&self, id: &DocId) -> Result<Document> {
        let bytes = self
            .documents
            .get(id)
            .ok_or_else(|| Error::not_found(format!("document {}", id)))?;
        decode(id, &bytes)
    }

    /// Materialize every live document.
    pub fn get_all(&self) -> Result<HashMap<DocId, Document>> {
        self.documents
            .snapshot()
            .into_iter()
            .map(|(id, bytes)| {
                let doc = decode(&id, &bytes)?;
                Ok((id, doc))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn purge_expired(&self) -> usize {
        self.documents.purge_expired()
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&self, id: DocId, bytes: Vec<u8>) {
        self.documents.set(id, bytes);
    }

    #[cfg(test)]
    pub(crate) fn expire(&self, id: &DocId) {
        if let Some(bytes) = self.documents.get(id) {
            let past = std::time::Instant::now() - Duration::from_millis(1);
            self.documents.set_with_deadline(id.clone(), bytes, Some(past));
        }
    }
}

fn decode(id: &DocId, bytes: &[u8]) -> Result<Document> {
    serde_json::from_slice(bytes).map_err(|e| {
        warn!(%id, error = %e, "stored document is corrupt");
        Error::internal(format!("corrupt document {}: {}", id, e))
    })
}
