//! News retrieval against a NewsAPI-compatible service.
//!
//! This module provides everything the UI needs to obtain articles:
//!
//! - **Types**: the wire shape of an article and its normalized form
//! - **Normalization**: a pure mapping from wire articles to display-ready ones
//! - **Client**: the two remote read operations (headlines and search)
//!
//! # Architecture
//!
//! - [`types`] - `RawArticle`, `Article`, `Category`, `SortBy`
//! - [`normalize`] - null-field fallbacks and content cleanup
//! - [`client`] - `NewsClient` over `reqwest`, with `NewsError`
//!
//! # Example
//!
//! ```ignore
//! use newsreel::news::{Category, NewsClient, DEFAULT_COUNTRY};
//!
//! let client = NewsClient::new(http, &config.news)?;
//! let articles = client.fetch_top_headlines(Category::Science, DEFAULT_COUNTRY).await?;
//! ```

mod client;
mod normalize;
mod types;

pub use client::{NewsClient, NewsError, Operation, DEFAULT_BASE_URL, DEFAULT_COUNTRY, PAGE_SIZE};
pub use normalize::{
    clean_content, normalize_article, FALLBACK_AUTHOR, FALLBACK_CONTENT, FALLBACK_DESCRIPTION,
    PLACEHOLDER_IMAGE_URL,
};
pub use types::{Article, ArticleSource, Category, RawArticle, SortBy};
