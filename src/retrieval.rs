//! Retrieval state: which articles are shown and why.
//!
//! The controller never performs I/O. Each intent updates state and hands
//! back a [`RetrievalRequest`] plus a [`Ticket`]; the caller runs the request
//! (normally on a background task) and feeds the outcome to
//! [`RetrievalController::complete`]. Only the most recently issued ticket
//! is applied, so a slow response for a category the user already left can
//! never overwrite newer results.

use crate::news::{
    Article, Category, NewsClient, NewsError, Operation, SortBy, DEFAULT_COUNTRY,
};
use std::sync::Arc;

/// Generation number of one issued retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// A retrieval the caller must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalRequest {
    Headlines { category: Category, country: String },
    Search { query: String, sort_by: SortBy },
}

impl RetrievalRequest {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Headlines { .. } => Operation::Headlines,
            Self::Search { .. } => Operation::Search,
        }
    }

    pub async fn execute(&self, client: &NewsClient) -> Result<Vec<Article>, NewsError> {
        match self {
            Self::Headlines { category, country } => {
                client.fetch_top_headlines(*category, country).await
            }
            Self::Search { query, sort_by } => client.search_news(query, *sort_by).await,
        }
    }
}

/// Derived lifecycle of the visible result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct RetrievalState {
    pub category: Category,
    pub search_query: String,
    pub articles: Arc<Vec<Article>>,
    pub loading: bool,
    /// Fixed user-facing message of the last failed retrieval.
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct RetrievalController {
    state: RetrievalState,
    generation: u64,
    latest_operation: Option<Operation>,
    country: String,
    sort_by: SortBy,
}

impl Default for RetrievalController {
    fn default() -> Self {
        Self::new()
    }
}

impl RetrievalController {
    /// Controller on `general` with no search, using default country and ordering.
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_COUNTRY, SortBy::default())
    }

    pub fn with_settings(country: &str, sort_by: SortBy) -> Self {
        Self {
            state: RetrievalState::default(),
            generation: 0,
            latest_operation: None,
            country: country.to_string(),
            sort_by,
        }
    }

    pub fn state(&self) -> &RetrievalState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.loading {
            Phase::Loading
        } else if self.state.error.is_some() {
            Phase::Error
        } else if self.latest_operation.is_none() {
            Phase::Idle
        } else {
            Phase::Success
        }
    }

    /// True while a search, rather than a category, drives the results.
    pub fn is_searching(&self) -> bool {
        !self.state.search_query.trim().is_empty()
    }

    /// Headlines for the current category (`general` on a fresh controller).
    pub fn initial_load(&mut self) -> (Ticket, RetrievalRequest) {
        let request = self.headlines_request();
        self.issue(request)
    }

    /// Switch category. Clears any search.
    pub fn change_category(&mut self, category: Category) -> (Ticket, RetrievalRequest) {
        self.state.category = category;
        self.state.search_query.clear();
        let request = self.headlines_request();
        self.issue(request)
    }

    /// Set the search string. A blank query falls back to the current
    /// category's headlines.
    pub fn search(&mut self, query: &str) -> (Ticket, RetrievalRequest) {
        self.state.search_query = query.to_string();
        let request = self.current_request();
        self.issue(request)
    }

    /// Re-run whatever currently drives the results.
    pub fn refresh(&mut self) -> (Ticket, RetrievalRequest) {
        let request = self.current_request();
        self.issue(request)
    }

    /// Apply the outcome of `ticket`'s request.
    ///
    /// Returns `false`, leaving state untouched, when a newer request has
    /// been issued since.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Vec<Article>, NewsError>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = ticket.0,
                "Ignoring stale retrieval result (generation mismatch)"
            );
            return false;
        }

        match result {
            Ok(articles) => {
                tracing::debug!(generation = ticket.0, count = articles.len(), "Retrieval applied");
                self.state.loading = false;
                self.state.articles = Arc::new(articles);
                self.state.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, operation = %self.operation(), "Retrieval failed");
                self.fail();
            }
        }
        true
    }

    /// Give up on `ticket` when its task died without an outcome.
    ///
    /// The current request is shown as failed; a stale ticket changes nothing.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        tracing::warn!(generation = ticket.0, operation = %self.operation(), "Retrieval abandoned");
        self.fail();
        true
    }

    /// Title above the article list.
    pub fn heading(&self) -> String {
        if self.is_searching() {
            format!("Search results for \"{}\" News", self.state.search_query.trim())
        } else {
            format!("{} News", self.state.category.name())
        }
    }

    /// One-line status under the heading.
    pub fn summary(&self) -> String {
        if self.state.loading {
            "Loading latest news...".to_string()
        } else {
            format!("{} articles found", self.state.articles.len())
        }
    }

    fn operation(&self) -> Operation {
        self.latest_operation.unwrap_or(Operation::Headlines)
    }

    fn fail(&mut self) {
        self.state.loading = false;
        self.state.articles = Arc::new(Vec::new());
        self.state.error = Some(self.operation().user_message().to_string());
    }

    fn headlines_request(&self) -> RetrievalRequest {
        RetrievalRequest::Headlines {
            category: self.state.category,
            country: self.country.clone(),
        }
    }

    fn current_request(&self) -> RetrievalRequest {
        if self.is_searching() {
            RetrievalRequest::Search {
                query: self.state.search_query.trim().to_string(),
                sort_by: self.sort_by,
            }
        } else {
            self.headlines_request()
        }
    }

    fn issue(&mut self, request: RetrievalRequest) -> (Ticket, RetrievalRequest) {
        self.generation = self.generation.wrapping_add(1);
        self.latest_operation = Some(request.operation());
        self.state.loading = true;
        self.state.error = None;
        tracing::debug!(generation = self.generation, ?request, "Retrieval issued");
        (Ticket(self.generation), request)
    }
}
