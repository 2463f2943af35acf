//! Post loading.
//!
//! One fetch of the static posts document per page view, parsed into
//! [`Post`]s in document order. Ordering for display is the renderer's job.

use crate::types::Post;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("malformed posts document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Retrieves a text resource by URL.
pub trait Fetch {
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, LoadError>>;
}

pub struct PostRepository<F> {
    fetch: F,
    url: String,
}

impl<F: Fetch> PostRepository<F> {
    pub fn new(fetch: F, url: impl Into<String>) -> Self {
        Self {
            fetch,
            url: url.into(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Post>, LoadError> {
        let body = self.fetch.fetch_text(&self.url).await?;
        let posts = parse_posts(&body)?;
        tracing::debug!(url = %self.url, count = posts.len(), "loaded posts");
        Ok(posts)
    }
}

/// Parse the posts document: a JSON array of post objects.
pub fn parse_posts(body: &str) -> Result<Vec<Post>, LoadError> {
    Ok(serde_json::from_str(body)?)
}
