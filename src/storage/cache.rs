use crossbeam::channel::{self, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::hash::Hash;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error};

struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

type Shared<K, V> = Arc<RwLock<HashMap<K, Entry<V>>>>;

/// Thread-safe key-value map whose entries expire after a fixed TTL.
///
/// Expired entries are invisible to readers immediately and are physically
/// removed either by `purge_expired` or by the janitor thread, when one is
/// configured.
pub struct ExpiringCache<K, V> {
    entries: Shared<K, V>,
    ttl: Option<Duration>,
    janitor: Option<Janitor>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Option<Duration>, cleanup_interval: Option<Duration>) -> Self {
        let entries: Shared<K, V> = Arc::new(RwLock::new(HashMap::new()));
        let janitor = cleanup_interval.map(|interval| Janitor::start(entries.clone(), interval));

        ExpiringCache {
            entries,
            ttl,
            janitor,
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.ttl.map(|ttl| Instant::now() + ttl)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    pub fn set(&self, key: K, value: V) {
        let expires_at = self.deadline();
        self.entries.write().insert(key, Entry { value, expires_at });
    }

    /// Read-modify-write of one entry under the write lock. An absent or
    /// expired entry starts from `default()`. The entry's TTL is refreshed.
    pub fn upsert<D, F>(&self, key: K, default: D, update: F)
    where
        D: FnOnce() -> V,
        F: FnOnce(&mut V),
    {
        let now = Instant::now();
        let expires_at = self.deadline();
        let mut entries = self.entries.write();
        match entries.entry(key) {
            MapEntry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.is_expired(now) {
                    entry.value = default();
                }
                update(&mut entry.value);
                entry.expires_at = expires_at;
            }
            MapEntry::Vacant(vacant) => {
                let mut value = default();
                update(&mut value);
                vacant.insert(Entry { value, expires_at });
            }
        }
    }

    /// Copy of every live entry.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        let now = Instant::now();
        self.entries
            .read()
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    pub fn purge_expired(&self) -> usize {
        purge(&*self.entries)
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_janitor(&self) -> bool {
        self.janitor.is_some()
    }

    #[cfg(test)]
    pub(crate) fn set_with_deadline(&self, key: K, value: V, expires_at: Option<Instant>) {
        self.entries.write().insert(key, Entry { value, expires_at });
    }
}

fn purge<K: Eq + Hash, V>(entries: &RwLock<HashMap<K, Entry<V>>>) -> usize {
    let now = Instant::now();
    let mut entries = entries.write();
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before - entries.len()
}

/// Background thread purging expired entries every `interval`. Stops when
/// its stop channel is dropped.
struct Janitor {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Janitor {
    fn start<K, V>(entries: Shared<K, V>, interval: Duration) -> Self
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let (stop_tx, stop_rx) = channel::bounded::<()>(0);

        // Runs until the sender is dropped
        let handle = thread::spawn(move || {
            while matches!(stop_rx.recv_timeout(interval), Err(RecvTimeoutError::Timeout)) {
                let removed = purge(&*entries);
                if removed > 0 {
                    debug!(removed, "purged expired cache entries");
                }
            }
        });

        Janitor {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("cache janitor thread panicked");
            }
        }
    }
}
