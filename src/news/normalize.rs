use super::types::{Article, RawArticle};

/// Image shown for articles that arrive without one.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.pexels.com/photos/518543/pexels-photo-518543.jpeg?auto=compress&cs=tinysrgb&w=800";
pub const FALLBACK_DESCRIPTION: &str = "No description available.";
pub const FALLBACK_AUTHOR: &str = "Unknown Author";
pub const FALLBACK_CONTENT: &str = "Content not available.";

/// Treats `None` and empty strings alike: both mean "the service sent nothing".
fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Map a wire article to a display-ready [`Article`].
///
/// Nullable fields receive fixed fallbacks; content falls back to the raw
/// description before the generic placeholder. All other fields pass through.
pub fn normalize_article(raw: RawArticle) -> Article {
    let description = present(raw.description);
    let content = present(raw.content)
        .or_else(|| description.clone())
        .unwrap_or_else(|| FALLBACK_CONTENT.to_string());

    Article {
        source: raw.source,
        author: present(raw.author).unwrap_or_else(|| FALLBACK_AUTHOR.to_string()),
        title: raw.title,
        description: description.unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
        url: raw.url,
        url_to_image: present(raw.url_to_image)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        published_at: raw.published_at,
        content,
    }
}

/// Replace the service's trailing truncation marker (`"[+1234 chars]"`) with
/// an ellipsis. Content without the marker is returned unchanged.
pub fn clean_content(content: &str) -> String {
    let trimmed = content.trim_end();
    if let Some(open) = trimmed.rfind("[+") {
        let marker = &trimmed[open + 2..];
        if let Some(count) = marker.strip_suffix(" chars]") {
            if !count.is_empty() && count.chars().all(|c| c.is_ascii_digit()) {
                return format!("{}...", &trimmed[..open]);
            }
        }
    }
    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::ArticleSource;
    use pretty_assertions::assert_eq;

    fn raw_article() -> RawArticle {
        RawArticle {
            source: ArticleSource {
                id: Some("wire".to_string()),
                name: "Wire".to_string(),
            },
            author: Some("Ada".to_string()),
            title: "Title".to_string(),
            description: Some("Desc".to_string()),
            url: "https://example.com/a".to_string(),
            url_to_image: Some("https://example.com/a.jpg".to_string()),
            published_at: "2024-03-01T12:00:00Z".to_string(),
            content: Some("Body".to_string()),
        }
    }

    #[test]
    fn test_complete_article_passes_through() {
        let article = normalize_article(raw_article());
        assert_eq!(
            article,
            Article {
                source: ArticleSource {
                    id: Some("wire".to_string()),
                    name: "Wire".to_string(),
                },
                author: "Ada".to_string(),
                title: "Title".to_string(),
                description: "Desc".to_string(),
                url: "https://example.com/a".to_string(),
                url_to_image: "https://example.com/a.jpg".to_string(),
                published_at: "2024-03-01T12:00:00Z".to_string(),
                content: "Body".to_string(),
            }
        );
    }

    #[test]
    fn test_null_fields_get_fallbacks() {
        let mut raw = raw_article();
        raw.author = None;
        raw.description = None;
        raw.url_to_image = None;
        raw.content = None;

        let article = normalize_article(raw);
        assert_eq!(article.author, FALLBACK_AUTHOR);
        assert_eq!(article.description, FALLBACK_DESCRIPTION);
        assert_eq!(article.url_to_image, PLACEHOLDER_IMAGE_URL);
        assert_eq!(article.content, FALLBACK_CONTENT);
        // Non-null fields untouched
        assert_eq!(article.title, "Title");
        assert_eq!(article.url, "https://example.com/a");
        assert_eq!(article.source.id.as_deref(), Some("wire"));
    }

    #[test]
    fn test_missing_content_uses_description() {
        let mut raw = raw_article();
        raw.content = None;
        let article = normalize_article(raw);
        assert_eq!(article.content, "Desc");
    }

    #[test]
    fn test_empty_strings_treated_as_missing() {
        let mut raw = raw_article();
        raw.author = Some(String::new());
        raw.url_to_image = Some(String::new());
        let article = normalize_article(raw);
        assert_eq!(article.author, FALLBACK_AUTHOR);
        assert_eq!(article.url_to_image, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_null_source_id_preserved() {
        let mut raw = raw_article();
        raw.source.id = None;
        let article = normalize_article(raw);
        assert!(article.source.id.is_none());
        assert_eq!(article.source.name, "Wire");
    }

    #[test]
    fn test_clean_content_strips_char_marker() {
        assert_eq!(
            clean_content("The market rallied today as… [+2841 chars]"),
            "The market rallied today as… ..."
        );
    }

    #[test]
    fn test_clean_content_leaves_other_text() {
        assert_eq!(clean_content("Plain body"), "Plain body");
        assert_eq!(clean_content("Odd [+abc chars]"), "Odd [+abc chars]");
        assert_eq!(clean_content("[+ chars]"), "[+ chars]");
    }
}
