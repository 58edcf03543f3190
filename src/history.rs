//! Bounded in-memory list of recent analyses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::extractor::SignalSet;
use crate::scorer::Score;

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub signals: SignalSet,
    pub score: Score,
}

/// Most-recent-first list of completed analyses; the oldest entry is
/// evicted once capacity is reached. Cloning shares the same list.
#[derive(Debug, Clone)]
pub struct RecentHistory {
    entries: Arc<RwLock<VecDeque<HistoryEntry>>>,
    capacity: usize,
}

impl Default for RecentHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl RecentHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a completed analysis and return its entry.
    pub async fn record(&self, signals: SignalSet, score: Score) -> HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            signals,
            score,
        };

        let mut entries = self.entries.write().await;
        entries.push_front(entry.clone());
        entries.truncate(self.capacity);
        entry
    }

    /// Snapshot, most recent first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn get(&self, id: Uuid) -> Option<HistoryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(url: &str) -> SignalSet {
        SignalSet::empty(url)
    }

    fn score(total: u32) -> Score {
        Score {
            on_page: 0,
            technical: 0,
            content: total,
            links: 0,
            total,
        }
    }

    #[tokio::test]
    async fn newest_entry_comes_first() {
        let history = RecentHistory::default();
        history.record(signals("https://a.example/"), score(5)).await;
        history.record(signals("https://b.example/"), score(10)).await;

        let urls: Vec<_> = history
            .list()
            .await
            .into_iter()
            .map(|e| e.signals.url)
            .collect();
        assert_eq!(urls, vec!["https://b.example/", "https://a.example/"]);
    }

    #[tokio::test]
    async fn oldest_entry_is_evicted_at_capacity() {
        let history = RecentHistory::default();
        let first = history.record(signals("https://0.example/"), score(0)).await;
        for i in 1..=DEFAULT_CAPACITY {
            history
                .record(signals(&format!("https://{i}.example/")), score(5))
                .await;
        }

        assert_eq!(history.len().await, DEFAULT_CAPACITY);
        assert!(history.get(first.id).await.is_none());
        assert_eq!(history.list().await[0].signals.url, "https://10.example/");
    }

    #[tokio::test]
    async fn lookup_by_id() {
        let history = RecentHistory::with_capacity(2);
        assert!(history.is_empty().await);

        let entry = history.record(signals("https://a.example/"), score(42)).await;
        let found = history.get(entry.id).await.expect("entry recorded");
        assert_eq!(found.score.total, 42);
        assert!(history.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn clones_share_the_list() {
        let history = RecentHistory::default();
        let other = history.clone();
        history.record(signals("https://a.example/"), score(1)).await;
        assert_eq!(other.len().await, 1);
    }
}
