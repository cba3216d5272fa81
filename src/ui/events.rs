//! Application event handling.
//!
//! This module applies background task results (retrievals, banner loads,
//! ad playback, stats writes) to `App`.

use crate::app::{App, AppEvent};

/// Apply one background task event to the application state.
///
/// Stats snapshots in event payloads are only logged. The panel always
/// shows the store's latest published value, since events can arrive out of
/// order with respect to the writes that produced them.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::RetrievalCompleted { ticket, result } => {
            app.apply_retrieval(ticket, result);
        }
        AppEvent::RetrievalPanicked { ticket, error } => {
            tracing::error!(error = %error, "Retrieval task panicked");
            if app.retrieval.abandon(ticket) {
                app.set_status("Internal error in retrieval task");
            }
        }
        AppEvent::BannerLoaded(slot) => {
            app.banners_loaded.insert(slot);
        }
        AppEvent::BannerFailed { slot, error } => {
            // The slot keeps its loading placeholder.
            tracing::debug!(%slot, error = %error, "Banner slot left unfilled");
        }
        AppEvent::ArticleReadRecorded(stats) => {
            tracing::debug!(articles_read = stats.articles_read, "Article read recorded");
            app.stats = app.stats_store.latest();
        }
        AppEvent::ArticleReadFailed(error) => {
            app.set_status(format!("Failed to save stats: {}", error));
        }
        AppEvent::InterstitialStarted => {
            app.interstitials_showing += 1;
        }
        AppEvent::InterstitialFinished(result) => {
            app.interstitials_showing = app.interstitials_showing.saturating_sub(1);
            match result {
                Ok(()) => tracing::info!("Interstitial ad completed"),
                Err(e) => app.set_status(format!("Ad unavailable: {}", e)),
            }
        }
        AppEvent::RewardEarned { coins, stats } => {
            tracing::debug!(coins, coins_earned = stats.coins_earned, "Reward stored");
            app.watching_rewarded = false;
            app.stats = app.stats_store.latest();
            app.set_status(format!("Congratulations! You earned {} coins!", coins));
        }
        AppEvent::RewardFailed(error) => {
            app.watching_rewarded = false;
            app.set_status(format!("Rewarded ad failed: {}", error));
        }
        AppEvent::RewardSaveFailed(error) => {
            app.watching_rewarded = false;
            app.set_status(format!("Failed to save stats: {}", error));
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            if task == "rewarded_ad" {
                app.watching_rewarded = false;
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
