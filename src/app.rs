use crate::ads::{AdError, AdService};
use crate::news::{Article, Category, NewsClient, NewsError};
use crate::retrieval::{RetrievalController, RetrievalRequest, Ticket};
use crate::storage::{EngagementStats, StatsStore};
use crate::theme::Palette;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::Instant;

/// Maximum scroll offset for the detail view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// An inline ad row follows every this-many articles in the list.
pub const INLINE_AD_EVERY: usize = 6;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// View and Ad Slots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse, // Category bar, article list and sidebar
    Detail, // Article overlay on top of the browse layout
}

/// Placement of a banner ad on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BannerSlot {
    Top,
    Bottom,
    Sidebar,
    Inline,
}

impl BannerSlot {
    pub const ALL: [BannerSlot; 4] = [
        BannerSlot::Top,
        BannerSlot::Bottom,
        BannerSlot::Sidebar,
        BannerSlot::Inline,
    ];

    /// Headline shown once the slot's banner has loaded.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Top => "Stay Informed with Premium News",
            Self::Bottom => "Discover More Stories",
            Self::Sidebar | Self::Inline => "Breaking News Alerts",
        }
    }
}

impl std::fmt::Display for BannerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Sidebar => "sidebar",
            Self::Inline => "inline",
        })
    }
}

// ============================================================================
// Events
// ============================================================================

/// Results delivered from background tasks to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A retrieval finished. Applied only if `ticket` is still current.
    RetrievalCompleted {
        ticket: Ticket,
        result: Result<Vec<Article>, NewsError>,
    },
    BannerLoaded(BannerSlot),
    BannerFailed {
        slot: BannerSlot,
        error: AdError,
    },
    /// An opened article was counted.
    ArticleReadRecorded(EngagementStats),
    InterstitialStarted,
    InterstitialFinished(Result<(), AdError>),
    /// A rewarded ad completed and its coins were stored.
    RewardEarned {
        coins: u64,
        stats: EngagementStats,
    },
    /// The rewarded ad did not complete.
    RewardFailed(String),
    /// Counting an opened article failed.
    ArticleReadFailed(String),
    /// A rewarded ad completed but its coins could not be stored.
    RewardSaveFailed(String),
    /// A retrieval task panicked before reporting its outcome.
    RetrievalPanicked {
        ticket: Ticket,
        error: String,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Short name of the task for the status line
    /// - `error`: The panic payload, if it was a string
    TaskPanicked {
        task: &'static str,
        error: String,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state. Owned and mutated by the event loop only.
pub struct App {
    pub news: Arc<NewsClient>,
    pub ads: Arc<AdService>,
    pub stats_store: Arc<StatsStore>,
    pub theme: Palette,

    pub retrieval: RetrievalController,
    /// Latest engagement snapshot, kept current from the store's watch channel.
    pub stats: EngagementStats,

    pub view: View,
    pub selected_article: usize,
    /// Article shown in the detail overlay. Owned so a refresh underneath
    /// cannot swap it out.
    pub detail_article: Option<Article>,
    pub detail_scroll: usize,

    pub search_mode: bool,
    pub search_input: String,

    pub banners_loaded: HashSet<BannerSlot>,
    /// Interstitials currently playing. Reads can qualify while one is
    /// still on screen, so they may overlap.
    pub interstitials_showing: usize,
    pub watching_rewarded: bool,

    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,
}

impl App {
    pub fn new(
        news: Arc<NewsClient>,
        ads: Arc<AdService>,
        stats_store: Arc<StatsStore>,
        retrieval: RetrievalController,
    ) -> Self {
        let stats = stats_store.latest();
        Self {
            news,
            ads,
            stats_store,
            theme: Palette::default(),
            retrieval,
            stats,
            view: View::Browse,
            selected_article: 0,
            detail_article: None,
            detail_scroll: 0,
            search_mode: false,
            search_input: String::new(),
            banners_loaded: HashSet::new(),
            interstitials_showing: 0,
            watching_rewarded: false,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    pub fn articles(&self) -> &Arc<Vec<Article>> {
        &self.retrieval.state().articles
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles().get(self.selected_article)
    }

    /// Article the `o` key opens: the detail article if one is shown,
    /// otherwise the list selection.
    pub fn focused_article(&self) -> Option<&Article> {
        match self.view {
            View::Detail => self.detail_article.as_ref(),
            View::Browse => self.selected_article(),
        }
    }

    pub fn category(&self) -> Category {
        self.retrieval.state().category
    }

    pub fn interstitial_active(&self) -> bool {
        self.interstitials_showing > 0
    }

    pub fn banner_loaded(&self, slot: BannerSlot) -> bool {
        self.banners_loaded.contains(&slot)
    }

    /// Navigate up: list selection in browse, scroll in detail.
    pub fn nav_up(&mut self) {
        match self.view {
            View::Browse => {
                self.selected_article = self.selected_article.saturating_sub(1);
            }
            View::Detail => self.scroll_up(1),
        }
    }

    /// Navigate down: list selection in browse, scroll in detail.
    pub fn nav_down(&mut self) {
        match self.view {
            View::Browse => {
                let len = self.articles().len();
                if len > 0 {
                    self.selected_article = self.selected_article.saturating_add(1).min(len - 1);
                }
            }
            View::Detail => self.scroll_down(1),
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.detail_scroll = self.detail_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.detail_scroll = self.detail_scroll.saturating_add(lines).min(MAX_SCROLL);
    }

    // ------------------------------------------------------------------------
    // Retrieval intents
    // ------------------------------------------------------------------------

    pub fn initial_load(&mut self) -> (Ticket, RetrievalRequest) {
        self.retrieval.initial_load()
    }

    /// Switch category, leaving search mode and resetting the selection.
    pub fn change_category(&mut self, category: Category) -> (Ticket, RetrievalRequest) {
        self.search_mode = false;
        self.search_input.clear();
        self.selected_article = 0;
        self.retrieval.change_category(category)
    }

    /// Submit the search line. A blank line reverts to category browsing.
    pub fn submit_search(&mut self) -> (Ticket, RetrievalRequest) {
        self.search_mode = false;
        self.selected_article = 0;
        let query = self.search_input.trim().to_string();
        if query.is_empty() {
            self.search_input.clear();
        }
        self.retrieval.search(&query)
    }

    pub fn refresh(&mut self) -> (Ticket, RetrievalRequest) {
        self.retrieval.refresh()
    }

    /// Feed a retrieval outcome to the controller. Returns true if applied.
    pub fn apply_retrieval(&mut self, ticket: Ticket, result: Result<Vec<Article>, NewsError>) -> bool {
        let applied = self.retrieval.complete(ticket, result);
        if applied {
            self.selected_article = 0;
        }
        applied
    }

    // ------------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------------
    // Detail overlay
    // ------------------------------------------------------------------------

    /// Open the detail overlay for the selected article.
    ///
    /// Returns the article so the caller can record the read.
    pub fn open_detail(&mut self) -> Option<Article> {
        let article = self.selected_article()?.clone();
        self.view = View::Detail;
        self.detail_scroll = 0;
        self.detail_article = Some(article.clone());
        Some(article)
    }

    pub fn close_detail(&mut self) {
        self.view = View::Browse;
        self.detail_scroll = 0;
        self.detail_article = None;
    }
}

/// Row of article `index` in the list once inline ad rows are interleaved.
pub fn display_row(index: usize) -> usize {
    index + index / INLINE_AD_EVERY
}

/// True if an inline ad row follows article `index`.
pub fn inline_ad_after(index: usize) -> bool {
    (index + 1) % INLINE_AD_EVERY == 0
}
