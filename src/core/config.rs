use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub document_ttl: Option<Duration>,   // None keeps documents forever
    pub index_ttl: Option<Duration>,      // None keeps index entries forever
    pub cleanup_interval: Option<Duration>, // None disables the background janitor
}

impl Default for Config {
    fn default() -> Self {
        Config {
            document_ttl: Some(Duration::from_secs(30 * 60)),
            index_ttl: Some(Duration::from_secs(30 * 60)),
            cleanup_interval: Some(Duration::from_secs(10 * 60)),
        }
    }
}

impl Config {
    /// Nothing expires and no janitor thread is started.
    pub fn no_expiry() -> Self {
        Config {
            document_ttl: None,
            index_ttl: None,
            cleanup_interval: None,
        }
    }

    pub fn with_document_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.document_ttl = ttl;
        self
    }

    pub fn with_index_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.index_ttl = ttl;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Option<Duration>) -> Self {
        self.cleanup_interval = interval;
        self
    }
}
