use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PageView, PageViewStats};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

// Boundary to the persistence layer. The relational backend lives behind
// this trait; the in-process store below is the default implementation.
#[async_trait]
pub trait EventStore: Send + Sync {
    // Append one enriched page view.
    async fn record(&self, view: PageView) -> Result<(), StoreError>;

    // Views per page_url, most viewed first.
    async fn top_pages(&self) -> Result<Vec<PageViewStats>, StoreError>;
}

// Append-only in-memory store. Aggregation happens on read; ingest is a
// plain push under the write lock.
pub struct MemoryStore {
    views: RwLock<Vec<PageView>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            views: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.views.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn record(&self, view: PageView) -> Result<(), StoreError> {
        self.views.write().unwrap().push(view);
        Ok(())
    }

    async fn top_pages(&self) -> Result<Vec<PageViewStats>, StoreError> {
        let views = self.views.read().unwrap();

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for view in views.iter() {
            *counts.entry(view.page_url.as_str()).or_insert(0) += 1;
        }

        let mut stats: Vec<PageViewStats> = counts
            .into_iter()
            .map(|(page_url, views)| PageViewStats {
                page_url: page_url.to_string(),
                views,
            })
            .collect();

        // most viewed first, URL as tiebreak so output order is stable
        stats.sort_by(|a, b| b.views.cmp(&a.views).then(a.page_url.cmp(&b.page_url)));

        Ok(stats)
    }
}
