use std::collections::BTreeMap;

use crate::FetchError;

/// External collaborator that turns a URL into page HTML.
///
/// Transport, retry and backoff belong to the implementation; the pipeline
/// only sees the page source or a [`FetchError`].
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Serves pages from memory. Unknown URLs fail with status 404.
#[derive(Debug, Default, Clone)]
pub struct StaticFetcher {
    pages: BTreeMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::new(Some(404), url, "not found"))
    }
}
