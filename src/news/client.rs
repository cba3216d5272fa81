use super::normalize::normalize_article;
use super::types::{Article, Category, NewsResponse, SortBy};
use crate::config::NewsApiConfig;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_COUNTRY: &str = "us";
/// Articles requested per call, for both endpoints.
pub const PAGE_SIZE: u32 = 20;

const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024; // 2MB
const SEARCH_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("News API key is not configured")]
    MissingApiKey,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// The two remote read operations. Each owns one fixed user-facing failure
/// message; the underlying [`NewsError`] is only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Headlines,
    Search,
}

impl Operation {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Headlines => "Failed to fetch news. Please try again later.",
            Self::Search => "Failed to search news. Please try again later.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Headlines => "headlines",
            Self::Search => "search",
        })
    }
}

/// Client for a NewsAPI-compatible service.
///
/// Holds the credential as a [`SecretString`]; it is sent in the `X-Api-Key`
/// header and never appears in URLs or logs.
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl NewsClient {
    /// Build a client from resolved configuration.
    ///
    /// A missing key is not an error here: the client refuses each request
    /// with [`NewsError::MissingApiKey`] instead, so the UI can still start.
    pub fn new(http: reqwest::Client, config: &NewsApiConfig) -> Result<Self, NewsError> {
        let base_url = parse_base_url(&config.base_url)?;
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::from(k.to_string()));

        if api_key.is_none() {
            tracing::warn!("No news API key configured; retrievals will fail until NEWS_API_KEY is set");
        }

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch current top headlines.
    ///
    /// `Category::General` omits the `category` parameter entirely.
    pub async fn fetch_top_headlines(
        &self,
        category: Category,
        country: &str,
    ) -> Result<Vec<Article>, NewsError> {
        let key = self.require_key()?;
        let mut url = self.endpoint("top-headlines")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("country", country);
            query.append_pair("pageSize", &PAGE_SIZE.to_string());
            if category != Category::General {
                query.append_pair("category", category.id());
            }
        }

        tracing::debug!(category = %category, country, "Fetching top headlines");
        let articles = self.get_articles(url, key).await.inspect_err(|e| {
            tracing::warn!(error = %e, category = %category, "Headlines request failed");
        })?;
        tracing::info!(category = %category, count = articles.len(), "Fetched top headlines");
        Ok(articles)
    }

    /// Full-text search.
    ///
    /// A blank or whitespace-only query short-circuits to an empty result
    /// without touching the network or checking the credential.
    pub async fn search_news(&self, query: &str, sort_by: SortBy) -> Result<Vec<Article>, NewsError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let key = self.require_key()?;
        let mut url = self.endpoint("everything")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("sortBy", sort_by.as_param())
            .append_pair("pageSize", &PAGE_SIZE.to_string())
            .append_pair("language", SEARCH_LANGUAGE);

        tracing::debug!(query_len = query.len(), sort_by = sort_by.as_param(), "Searching news");
        let articles = self.get_articles(url, key).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Search request failed");
        })?;
        tracing::info!(count = articles.len(), "Search returned articles");
        Ok(articles)
    }

    fn require_key(&self) -> Result<&SecretString, NewsError> {
        self.api_key.as_ref().ok_or_else(|| {
            tracing::error!("Refusing news request: API key not configured");
            NewsError::MissingApiKey
        })
    }

    fn endpoint(&self, name: &str) -> Result<Url, NewsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NewsError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    async fn get_articles(&self, url: Url, key: &SecretString) -> Result<Vec<Article>, NewsError> {
        let response = self
            .http
            .get(url)
            .header("X-Api-Key", key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::HttpStatus(status.as_u16()));
        }

        let body = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        let parsed: NewsResponse = serde_json::from_slice(&body)?;

        if parsed.status != "ok" {
            return Err(NewsError::Api {
                code: parsed.code.unwrap_or_else(|| "unknown".to_string()),
                message: parsed.message.unwrap_or_default(),
            });
        }

        Ok(parsed.articles.into_iter().map(normalize_article).collect())
    }
}

/// HTTPS only, with a plain-HTTP exception for local test servers.
fn parse_base_url(raw: &str) -> Result<Url, NewsError> {
    let url = Url::parse(raw.trim()).map_err(|e| NewsError::InvalidBaseUrl(e.to_string()))?;
    match url.scheme() {
        "https" => Ok(url),
        "http" if matches!(url.host_str(), Some("localhost") | Some("127.0.0.1")) => {
            tracing::warn!(base_url = %url, "Using non-HTTPS news base URL (localhost only)");
            Ok(url)
        }
        _ => {
            tracing::error!(base_url = %url, "Rejecting non-HTTPS news base URL");
            Err(NewsError::InsecureBaseUrl)
        }
    }
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, NewsError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::{FALLBACK_AUTHOR, PLACEHOLDER_IMAGE_URL};
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str, api_key: Option<&str>) -> NewsApiConfig {
        NewsApiConfig {
            api_key: api_key.map(String::from),
            base_url: base_url.to_string(),
            ..NewsApiConfig::default()
        }
    }

    fn client_for(server: &MockServer) -> NewsClient {
        NewsClient::new(reqwest::Client::new(), &config(&server.uri(), Some("test-key"))).unwrap()
    }

    fn ok_body() -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": {"id": "wire", "name": "Wire"},
                    "author": "Ada",
                    "title": "First",
                    "description": "One",
                    "url": "https://example.com/1",
                    "urlToImage": "https://example.com/1.jpg",
                    "publishedAt": "2024-03-01T12:00:00Z",
                    "content": "Body one"
                },
                {
                    "source": {"id": null, "name": "Other"},
                    "author": null,
                    "title": "Second",
                    "description": null,
                    "url": "https://example.com/2",
                    "urlToImage": null,
                    "publishedAt": "2024-03-01T13:00:00Z",
                    "content": null
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_headlines_sends_category_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(query_param("country", "us"))
            .and(query_param("category", "technology"))
            .and(query_param("pageSize", "20"))
            .and(header("X-Api-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let articles = client_for(&server)
            .fetch_top_headlines(Category::Technology, DEFAULT_COUNTRY)
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First");
        assert_eq!(articles[1].title, "Second");
        assert_eq!(articles[1].author, FALLBACK_AUTHOR);
        assert_eq!(articles[1].url_to_image, PLACEHOLDER_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_general_category_omits_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(query_param_is_missing("category"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch_top_headlines(Category::General, DEFAULT_COUNTRY)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_search_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", "rust lang"))
            .and(query_param("sortBy", "publishedAt"))
            .and(query_param("pageSize", "20"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let articles = client_for(&server)
            .search_news("rust lang", SortBy::default())
            .await
            .unwrap();
        assert_eq!(articles.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.search_news("", SortBy::default()).await.unwrap().is_empty());
        assert!(client.search_news("   ", SortBy::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_without_key_is_empty() {
        let client =
            NewsClient::new(reqwest::Client::new(), &config(DEFAULT_BASE_URL, None)).unwrap();
        let result = client.search_news("  ", SortBy::default()).await;
        assert!(matches!(result, Ok(ref v) if v.is_empty()));
    }

    #[tokio::test]
    async fn test_missing_key_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(0)
            .mount(&server)
            .await;

        let client =
            NewsClient::new(reqwest::Client::new(), &config(&server.uri(), Some("  "))).unwrap();
        assert!(!client.has_api_key());

        let headlines = client
            .fetch_top_headlines(Category::Science, DEFAULT_COUNTRY)
            .await;
        assert!(matches!(headlines, Err(NewsError::MissingApiKey)));

        let search = client.search_news("climate", SortBy::default()).await;
        assert!(matches!(search, Err(NewsError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch_top_headlines(Category::General, DEFAULT_COUNTRY)
            .await;
        assert!(matches!(result, Err(NewsError::HttpStatus(500))));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).search_news("x", SortBy::Relevancy).await;
        assert!(matches!(result, Err(NewsError::Decode(_))));
    }

    #[tokio::test]
    async fn test_error_status_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "code": "rateLimited",
                "message": "Too many requests"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch_top_headlines(Category::Health, DEFAULT_COUNTRY)
            .await;
        match result {
            Err(NewsError::Api { code, .. }) => assert_eq!(code, "rateLimited"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let server = MockServer::start().await;
        let huge = "x".repeat(MAX_RESPONSE_SIZE + 1);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(huge))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch_top_headlines(Category::General, DEFAULT_COUNTRY)
            .await;
        assert!(matches!(result, Err(NewsError::ResponseTooLarge(_))));
    }

    #[test]
    fn test_http_base_url_rejected() {
        let result = NewsClient::new(
            reqwest::Client::new(),
            &config("http://news.example.com/v2", Some("k")),
        );
        assert!(matches!(result, Err(NewsError::InsecureBaseUrl)));
    }

    #[test]
    fn test_unparsable_base_url_rejected() {
        let result = NewsClient::new(reqwest::Client::new(), &config("not a url", Some("k")));
        assert!(matches!(result, Err(NewsError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            NewsClient::new(reqwest::Client::new(), &config(DEFAULT_BASE_URL, Some("k"))).unwrap();
        assert_eq!(
            client.endpoint("everything").unwrap().as_str(),
            "https://newsapi.org/v2/everything"
        );

        let client = NewsClient::new(
            reqwest::Client::new(),
            &config("https://newsapi.org/v2/", Some("k")),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("top-headlines").unwrap().as_str(),
            "https://newsapi.org/v2/top-headlines"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = NewsClient::new(
            reqwest::Client::new(),
            &config(DEFAULT_BASE_URL, Some("super-secret")),
        )
        .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_user_messages_are_fixed() {
        assert_eq!(
            Operation::Headlines.user_message(),
            "Failed to fetch news. Please try again later."
        );
        assert_eq!(
            Operation::Search.user_message(),
            "Failed to search news. Please try again later."
        );
    }
}
