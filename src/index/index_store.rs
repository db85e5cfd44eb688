use std::collections::HashSet;
use std::time::Duration;

use crate::core::types::DocId;
use crate::storage::cache::ExpiringCache;

/// Secondary index: index key -> ids of the documents that produced it.
///
/// Entries may outlive the documents they point to; readers must treat a
/// missing document as a stale entry, not as corruption.
pub struct IndexStore {
    postings: ExpiringCache<String, HashSet<DocId>>,
}

impl IndexStore {
    pub fn new(ttl: Option<Duration>, cleanup_interval: Option<Duration>) -> Self {
        IndexStore {
            postings: ExpiringCache::new(ttl, cleanup_interval),
        }
    }

    /// Union `id` into the id set of every key. Idempotent.
    pub fn record_keys<'a, I>(&self, id: &DocId, keys: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for key in keys {
            self.postings.upsert(key.clone(), HashSet::new, |ids| {
                ids.insert(id.clone());
            });
        }
    }

    /// Ids recorded under `key`; empty for unknown keys.
    pub fn lookup(&self, key: &str) -> HashSet<DocId> {
        self.postings.get(&key.to_string()).unwrap_or_default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn purge_expired(&self) -> usize {
        self.postings.purge_expired()
    }
}
