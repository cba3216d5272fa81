use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Wire Types
// ============================================================================

/// Publisher of an article as reported by the news service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: String,
}

/// An article exactly as the news service returns it.
///
/// Nullable fields stay `Option` here; [`crate::news::normalize_article`]
/// turns this into an [`Article`] with every display field populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: String,
    pub content: Option<String>,
}

/// Envelope returned by both the headlines and the search endpoints.
///
/// Error responses carry `status = "error"` plus `code`/`message` and no
/// articles, so everything but `status` is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewsResponse {
    pub status: String,
    #[allow(dead_code)] // Deserialized for Debug output in error logs
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
    pub code: Option<String>,
    pub message: Option<String>,
}

// ============================================================================
// Normalized Article
// ============================================================================

/// A display-ready article. Immutable once normalized.
///
/// URLs are not unique within a result set, so lists address articles by
/// position rather than by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub source: ArticleSource,
    pub author: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub url_to_image: String,
    /// ISO-8601 timestamp, kept as received.
    pub published_at: String,
    pub content: String,
}

// ============================================================================
// Categories
// ============================================================================

/// The fixed set of headline categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    General,
    Business,
    Technology,
    Science,
    Health,
    Sports,
    Entertainment,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Technology,
        Category::Science,
        Category::Health,
        Category::Sports,
        Category::Entertainment,
    ];

    /// Identifier sent to the headlines endpoint.
    pub fn id(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Business => "business",
            Self::Technology => "technology",
            Self::Science => "science",
            Self::Health => "health",
            Self::Sports => "sports",
            Self::Entertainment => "entertainment",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Business => "Business",
            Self::Technology => "Technology",
            Self::Science => "Science",
            Self::Health => "Health",
            Self::Sports => "Sports",
            Self::Entertainment => "Entertainment",
        }
    }

    /// Decorative glyph shown next to the name in the category bar.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::General => "📰",
            Self::Business => "💼",
            Self::Technology => "💻",
            Self::Science => "🔬",
            Self::Health => "🏥",
            Self::Sports => "⚽",
            Self::Entertainment => "🎬",
        }
    }

    /// Parse a category identifier (case-insensitive).
    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s.trim()))
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Next category, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous category, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Search Ordering
// ============================================================================

/// Ordering requested from the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    PublishedAt,
    Relevancy,
    Popularity,
}

impl SortBy {
    /// Value of the `sortBy` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::PublishedAt => "publishedAt",
            Self::Relevancy => "relevancy",
            Self::Popularity => "popularity",
        }
    }

    /// Parse a `sortBy` value (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "publishedat" => Some(Self::PublishedAt),
            "relevancy" => Some(Self::Relevancy),
            "popularity" => Some(Self::Popularity),
            _ => None,
        }
    }
}
