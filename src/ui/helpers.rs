//! Helper functions for UI operations.
//!
//! Background work (retrievals, ad playback, stats writes) is spawned from
//! here. Every task reports back through the `AppEvent` channel and is
//! wrapped so a panic becomes `AppEvent::TaskPanicked` instead of vanishing.

use crate::ads::{should_show_interstitial, AdError, AdService};
use crate::app::{App, AppEvent, BannerSlot};
use crate::news::NewsClient;
use crate::retrieval::{RetrievalRequest, Ticket};
use crate::storage::{KeyValueBackend, StatsStore};
use crate::util::{copy_to_clipboard, validate_url_for_open};
use futures::FutureExt;
use std::future::Future;
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Pause between counting a read and showing the interstitial it earned.
pub(super) const INTERSTITIAL_DELAY: Duration = Duration::from_secs(1);

/// Wraps a future to catch panics and convert them to errors.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

async fn send(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
    }
}

/// Spawn `work` on the runtime, reporting a panic as `TaskPanicked`.
fn spawn_guarded<F>(task: &'static str, tx: mpsc::Sender<AppEvent>, work: F) -> tokio::task::JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic_msg) = catch_task_panic(work).await {
            tracing::error!(task, error = %panic_msg, "Background task panicked");
            send(&tx, AppEvent::TaskPanicked { task, error: panic_msg }).await;
        }
    })
}

/// Run one issued retrieval in the background.
pub(super) fn spawn_retrieval(
    news: Arc<NewsClient>,
    issued: (Ticket, RetrievalRequest),
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    let (ticket, request) = issued;
    // Not spawn_guarded: a panic must still name the ticket it abandons.
    tokio::spawn(async move {
        let event = match catch_task_panic(request.execute(&news)).await {
            Ok(result) => AppEvent::RetrievalCompleted { ticket, result },
            Err(error) => {
                tracing::error!(task = "retrieval", error = %error, "Background task panicked");
                AppEvent::RetrievalPanicked { ticket, error }
            }
        };
        send(&tx, event).await;
    })
}

/// Start loading one banner per slot.
pub(super) fn spawn_banner_loads(ads: Arc<AdService>, tx: &mpsc::Sender<AppEvent>) {
    for slot in BannerSlot::ALL {
        let ads = Arc::clone(&ads);
        let tx_task = tx.clone();
        spawn_guarded("banner", tx.clone(), async move {
            let event = match ads.show_banner().await {
                Ok(()) => AppEvent::BannerLoaded(slot),
                Err(error) => {
                    tracing::warn!(%slot, error = %error, "Failed to load banner ad");
                    AppEvent::BannerFailed { slot, error }
                }
            };
            send(&tx_task, event).await;
        });
    }
}

/// Count one opened article; every third read earns an interstitial.
pub(super) fn spawn_article_read<B: KeyValueBackend>(
    store: Arc<StatsStore<B>>,
    ads: Arc<AdService>,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    let tx_task = tx.clone();
    spawn_guarded("article_read", tx, async move {
        let stats = match store.increment_articles_read().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to record article read");
                send(&tx_task, AppEvent::ArticleReadFailed(e.to_string())).await;
                return;
            }
        };
        send(&tx_task, AppEvent::ArticleReadRecorded(stats)).await;

        if should_show_interstitial(stats.articles_read) {
            tokio::time::sleep(INTERSTITIAL_DELAY).await;
            send(&tx_task, AppEvent::InterstitialStarted).await;
            // Every start is paired with a finish so the overlay count balances.
            let result = catch_task_panic(ads.show_interstitial())
                .await
                .unwrap_or_else(|panic_msg| Err(AdError::Aborted(panic_msg)));
            send(&tx_task, AppEvent::InterstitialFinished(result)).await;
        }
    })
}

/// Play a rewarded ad and credit its coins.
pub(super) fn spawn_rewarded<B: KeyValueBackend>(
    store: Arc<StatsStore<B>>,
    ads: Arc<AdService>,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    let tx_task = tx.clone();
    spawn_guarded("rewarded_ad", tx, async move {
        let coins = match ads.show_rewarded().await {
            Ok(coins) => coins,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to show rewarded ad");
                send(&tx_task, AppEvent::RewardFailed(e.to_string())).await;
                return;
            }
        };
        let event = match store.add_coins_earned(coins).await {
            Ok(stats) => AppEvent::RewardEarned { coins, stats },
            Err(e) => {
                tracing::warn!(coins, error = %e, "Failed to store rewarded coins");
                AppEvent::RewardSaveFailed(e.to_string())
            }
        };
        send(&tx_task, event).await;
    })
}

/// Issue-side wrapper: mark the UI busy and spawn the retrieval.
pub(super) fn start_retrieval(
    app: &mut App,
    issued: (Ticket, RetrievalRequest),
    tx: &mpsc::Sender<AppEvent>,
) {
    app.spinner_frame = 0;
    spawn_retrieval(Arc::clone(&app.news), issued, tx.clone());
}

/// Begin a rewarded ad unless one is already playing.
pub(super) fn start_rewarded(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    if app.watching_rewarded {
        return;
    }
    app.watching_rewarded = true;
    spawn_rewarded(Arc::clone(&app.stats_store), Arc::clone(&app.ads), tx.clone());
}

/// Hand the focused article's URL to the system browser.
pub(super) fn open_focused_article(app: &mut App) {
    let Some(raw) = app.focused_article().map(|a| a.url.clone()) else {
        return;
    };
    // SEC: Validate URL before open::that() so only http(s) reaches the shell
    match validate_url_for_open(&raw) {
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                tracing::warn!(error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status("Opened in browser");
            }
        }
        Err(e) => app.set_status(format!("Cannot open link: {}", e)),
    }
}

/// Copy the focused article's URL to the system clipboard via `out`.
pub(super) fn share_focused_article(app: &mut App, out: &mut impl Write) {
    let Some(url) = app.focused_article().map(|a| a.url.clone()) else {
        return;
    };
    match copy_to_clipboard(out, &url) {
        Ok(()) => app.set_status("Article URL copied to clipboard!"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to copy article URL");
            app.set_status(format!("Failed to copy link: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::AdTimings;
    use crate::config::AdConfig;
    use crate::storage::{EngagementStats, MemoryBackend};

    fn instant_ads() -> Arc<AdService> {
        Arc::new(AdService::with_timings(
            AdConfig::default(),
            AdTimings {
                banner: Duration::ZERO,
                interstitial: Duration::from_millis(2000),
                rewarded: Duration::ZERO,
            },
        ))
    }

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_message() {
        let result = catch_task_panic(async { panic!("boom") }).await;
        assert_eq!(result, Err::<(), _>("boom".to_string()));
    }

    #[tokio::test]
    async fn test_guarded_panic_reports_event() {
        let (tx, mut rx) = mpsc::channel(4);
        spawn_guarded("test", tx, async { panic!("kaput {}", 1) }).await.unwrap();
        match rx.recv().await {
            Some(AppEvent::TaskPanicked { task, error }) => {
                assert_eq!(task, "test");
                assert_eq!(error, "kaput 1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_banner_loads_cover_every_slot() {
        let (tx, mut rx) = mpsc::channel(8);
        spawn_banner_loads(instant_ads(), &tx);
        drop(tx);

        let mut loaded = Vec::new();
        while let Some(event) = rx.recv().await {
            if let AppEvent::BannerLoaded(slot) = event {
                loaded.push(slot);
            }
        }
        assert_eq!(loaded.len(), BannerSlot::ALL.len());
        for slot in BannerSlot::ALL {
            assert!(loaded.contains(&slot));
        }
    }

    #[tokio::test]
    async fn test_banner_without_unit_id_fails() {
        let ads = Arc::new(AdService::new(AdConfig {
            banner_id: String::new(),
            ..AdConfig::default()
        }));
        let (tx, mut rx) = mpsc::channel(8);
        spawn_banner_loads(ads, &tx);
        drop(tx);

        while let Some(event) = rx.recv().await {
            assert!(matches!(event, AppEvent::BannerFailed { .. }));
        }
    }

    #[tokio::test]
    async fn test_article_read_without_interstitial() {
        let store = Arc::new(StatsStore::open(MemoryBackend::new()).await);
        let (tx, mut rx) = mpsc::channel(8);
        spawn_article_read(Arc::clone(&store), instant_ads(), tx).await.unwrap();

        match rx.recv().await {
            Some(AppEvent::ArticleReadRecorded(stats)) => assert_eq!(stats.articles_read, 1),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_third_read_shows_interstitial_after_delay() {
        let store = Arc::new(StatsStore::open(MemoryBackend::new()).await);
        let ads = instant_ads();
        for _ in 0..2 {
            store.increment_articles_read().await.unwrap();
        }

        let (tx, mut rx) = mpsc::channel(8);
        let start = tokio::time::Instant::now();
        spawn_article_read(store, ads, tx);

        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::ArticleReadRecorded(EngagementStats { articles_read: 3, .. }))
        ));
        assert!(matches!(rx.recv().await, Some(AppEvent::InterstitialStarted)));
        assert!(start.elapsed() >= INTERSTITIAL_DELAY);
        assert!(matches!(rx.recv().await, Some(AppEvent::InterstitialFinished(Ok(())))));
        assert!(start.elapsed() >= INTERSTITIAL_DELAY + Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_rewarded_credits_coins() {
        let store = Arc::new(StatsStore::open(MemoryBackend::new()).await);
        let (tx, mut rx) = mpsc::channel(8);
        spawn_rewarded(Arc::clone(&store), instant_ads(), tx).await.unwrap();

        match rx.recv().await {
            Some(AppEvent::RewardEarned { coins, stats }) => {
                assert!((5..=14).contains(&coins));
                assert_eq!(stats.coins_earned, coins);
                assert_eq!(stats.ads_watched, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(store.get_stats().await.ads_watched, 1);
    }

    #[tokio::test]
    async fn test_rewarded_failure_leaves_stats() {
        let store = Arc::new(StatsStore::open(MemoryBackend::new()).await);
        let ads = Arc::new(AdService::new(AdConfig {
            rewarded_id: " ".to_string(),
            ..AdConfig::default()
        }));
        let (tx, mut rx) = mpsc::channel(8);
        spawn_rewarded(Arc::clone(&store), ads, tx).await.unwrap();

        assert!(matches!(rx.recv().await, Some(AppEvent::RewardFailed(_))));
        assert_eq!(store.get_stats().await, EngagementStats::default());
    }

    async fn bare_app() -> App {
        let db = crate::storage::Database::open(":memory:").await.unwrap();
        let news = NewsClient::new(
            reqwest::Client::new(),
            &crate::config::NewsApiConfig::default(),
        )
        .unwrap();
        App::new(
            Arc::new(news),
            instant_ads(),
            Arc::new(StatsStore::open(db).await),
            crate::retrieval::RetrievalController::new(),
        )
    }

    async fn app_with_article() -> App {
        use crate::news::{Article, ArticleSource};

        let mut app = bare_app().await;
        let (ticket, _) = app.initial_load();
        let article = Article {
            source: ArticleSource {
                id: None,
                name: "Wire".to_string(),
            },
            author: "Ada".to_string(),
            title: "Shared".to_string(),
            description: "desc".to_string(),
            url: "https://example.com/shared".to_string(),
            url_to_image: String::new(),
            published_at: "2024-03-01T12:00:00Z".to_string(),
            content: "body".to_string(),
        };
        app.apply_retrieval(ticket, Ok(vec![article]));
        app
    }

    #[tokio::test]
    async fn test_share_copies_detail_url() {
        let mut app = app_with_article().await;
        app.open_detail();
        let mut out = Vec::new();
        share_focused_article(&mut app, &mut out);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            crate::util::osc52_sequence("https://example.com/shared")
        );
        let status = app.status_message.as_ref().map(|(m, _)| m.as_ref());
        assert_eq!(status, Some("Article URL copied to clipboard!"));
    }

    #[tokio::test]
    async fn test_share_without_article_writes_nothing() {
        let mut app = bare_app().await;
        let mut out = Vec::new();
        share_focused_article(&mut app, &mut out);
        assert!(out.is_empty());
        assert!(app.status_message.is_none());
    }
}
