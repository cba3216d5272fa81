use anyhow::{Context, Result};
use tokio::sync::{watch, Mutex};

use super::kv::KeyValueBackend;
use super::schema::Database;
use super::types::{EngagementStats, StatsUpdate};

/// Key of the single engagement record.
pub const STATS_KEY: &str = "engagement.stats";

/// Persisted engagement counters with change notification.
///
/// Reads never fail: an absent, unreadable or corrupt record is treated as
/// all-zero stats without writing anything back. Writes go through an async
/// mutex so concurrent read-modify-write sequences never lose an update.
/// Every successful write is published to receivers from
/// [`StatsStore::subscribe`].
pub struct StatsStore<B = Database> {
    backend: B,
    write_lock: Mutex<()>,
    changes: watch::Sender<EngagementStats>,
}

impl<B: KeyValueBackend> StatsStore<B> {
    /// Wrap `backend`, seeding the change channel with the stored record.
    pub async fn open(backend: B) -> Self {
        let initial = read_record(&backend).await;
        let (changes, _) = watch::channel(initial);
        Self {
            backend,
            write_lock: Mutex::new(()),
            changes,
        }
    }

    /// Current stats from storage, zeros if absent or unreadable.
    pub async fn get_stats(&self) -> EngagementStats {
        read_record(&self.backend).await
    }

    /// Receiver that observes every successful write.
    pub fn subscribe(&self) -> watch::Receiver<EngagementStats> {
        self.changes.subscribe()
    }

    /// Last published snapshot, without touching storage.
    pub fn latest(&self) -> EngagementStats {
        *self.changes.borrow()
    }

    /// Merge the present fields of `update` over the stored stats.
    pub async fn update_stats(&self, update: StatsUpdate) -> Result<EngagementStats> {
        self.modify(|current| current.merged(update)).await
    }

    /// Count one opened article.
    pub async fn increment_articles_read(&self) -> Result<EngagementStats> {
        self.modify(|current| EngagementStats {
            articles_read: current.articles_read.saturating_add(1),
            ..current
        })
        .await
    }

    /// Credit `coins` from one completed rewarded ad.
    pub async fn add_coins_earned(&self, coins: u64) -> Result<EngagementStats> {
        self.modify(|current| EngagementStats {
            coins_earned: current.coins_earned.saturating_add(coins),
            ads_watched: current.ads_watched.saturating_add(1),
            ..current
        })
        .await
    }

    async fn modify(
        &self,
        apply: impl FnOnce(EngagementStats) -> EngagementStats,
    ) -> Result<EngagementStats> {
        let _guard = self.write_lock.lock().await;

        let next = apply(read_record(&self.backend).await);
        let json = serde_json::to_string(&next).context("Failed to serialize engagement stats")?;
        self.backend
            .set(STATS_KEY, &json)
            .await
            .context("Failed to persist engagement stats")?;

        self.changes.send_replace(next);
        tracing::debug!(
            articles_read = next.articles_read,
            coins_earned = next.coins_earned,
            ads_watched = next.ads_watched,
            "Engagement stats updated"
        );
        Ok(next)
    }
}

async fn read_record<B: KeyValueBackend>(backend: &B) -> EngagementStats {
    let raw = match backend.get(STATS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return EngagementStats::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read engagement stats, using zeros");
            return EngagementStats::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Corrupt engagement stats record, using zeros");
        EngagementStats::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::should_show_interstitial;
    use crate::storage::MemoryBackend;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn stats(articles_read: u64, coins_earned: u64, ads_watched: u64) -> EngagementStats {
        EngagementStats {
            articles_read,
            coins_earned,
            ads_watched,
        }
    }

    /// Backend whose writes always fail.
    struct ReadOnlyBackend;

    impl KeyValueBackend for ReadOnlyBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[tokio::test]
    async fn test_absent_record_reads_zero_without_writing() {
        let backend = MemoryBackend::new();
        let store = StatsStore::open(backend.clone()).await;
        assert_eq!(store.get_stats().await, EngagementStats::default());
        assert_eq!(backend.get(STATS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_record_reads_zero() {
        let store = StatsStore::open(MemoryBackend::with_entry(STATS_KEY, "{not json")).await;
        assert_eq!(store.get_stats().await, EngagementStats::default());
    }

    #[tokio::test]
    async fn test_add_coins_earned_accumulates() {
        let store = StatsStore::open(MemoryBackend::new()).await;
        assert_eq!(store.add_coins_earned(8).await.unwrap(), stats(0, 8, 1));
        assert_eq!(store.add_coins_earned(5).await.unwrap(), stats(0, 13, 2));
        assert_eq!(store.get_stats().await, stats(0, 13, 2));
    }

    #[tokio::test]
    async fn test_three_reads_trigger_interstitial() {
        let store = StatsStore::open(MemoryBackend::new()).await;
        let mut last = EngagementStats::default();
        for _ in 0..3 {
            last = store.increment_articles_read().await.unwrap();
        }
        assert_eq!(last.articles_read, 3);
        assert!(should_show_interstitial(last.articles_read));
    }

    #[tokio::test]
    async fn test_update_stats_merges_partial() {
        let store = StatsStore::open(MemoryBackend::new()).await;
        store.add_coins_earned(7).await.unwrap();

        let merged = store
            .update_stats(StatsUpdate {
                articles_read: Some(42),
                ..StatsUpdate::default()
            })
            .await
            .unwrap();
        assert_eq!(merged, stats(42, 7, 1));
    }

    #[tokio::test]
    async fn test_record_is_camel_case_json() {
        let backend = MemoryBackend::new();
        let store = StatsStore::open(backend.clone()).await;
        store.increment_articles_read().await.unwrap();

        let raw = backend.get(STATS_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"articlesRead":1,"coinsEarned":0,"adsWatched":0}"#);
    }

    #[tokio::test]
    async fn test_subscribers_observe_writes() {
        let store = StatsStore::open(MemoryBackend::new()).await;
        let mut rx = store.subscribe();
        assert_eq!(*rx.borrow_and_update(), EngagementStats::default());

        store.add_coins_earned(9).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), stats(0, 9, 1));
        assert_eq!(store.latest(), stats(0, 9, 1));
    }

    #[tokio::test]
    async fn test_open_seeds_channel_from_storage() {
        let backend = MemoryBackend::with_entry(
            STATS_KEY,
            r#"{"articlesRead":5,"coinsEarned":30,"adsWatched":3}"#,
        );
        let store = StatsStore::open(backend).await;
        assert_eq!(*store.subscribe().borrow(), stats(5, 30, 3));
    }

    #[tokio::test]
    async fn test_failed_write_propagates_and_publishes_nothing() {
        let store = StatsStore::open(ReadOnlyBackend).await;
        let rx = store.subscribe();

        let err = store.increment_articles_read().await.unwrap_err();
        assert!(err.to_string().contains("persist"));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(StatsStore::open(MemoryBackend::new()).await);

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment_articles_read().await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get_stats().await.articles_read, 20);
    }

    #[tokio::test]
    async fn test_database_backend_round_trip() {
        let db = Database::open(":memory:").await.unwrap();
        let store = StatsStore::open(db.clone()).await;
        store.add_coins_earned(12).await.unwrap();

        let reopened = StatsStore::open(db).await;
        assert_eq!(reopened.get_stats().await, stats(0, 12, 1));
    }
}
