use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpenUrlError {
    #[error("Invalid article URL")]
    Invalid,
    #[error("Refusing to open {0} URL (only http/https)")]
    UnsupportedScheme(String),
    #[error("Article URL has no host")]
    MissingHost,
}

/// Check an article URL before passing it to `open::that`.
///
/// Only absolute `http`/`https` URLs with a host are handed to the system
/// opener, so a crafted `url` field cannot launch local files or handlers.
pub fn validate_url_for_open(raw: &str) -> Result<Url, OpenUrlError> {
    let url = Url::parse(raw.trim()).map_err(|_| OpenUrlError::Invalid)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(OpenUrlError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(OpenUrlError::MissingHost);
    }
    Ok(url)
}
