pub mod http_fetcher;
pub mod timeline;

use async_trait::async_trait;

use crate::app::Result;

/// Media type requested for account feeds.
pub const RSS_ACCEPT: &str = "application/rss+xml";

#[async_trait]
pub trait Fetcher {
    /// GET `url` and return the body of a successful response.
    ///
    /// Non-success statuses surface as `FanlineError::Status` and
    /// elapsed timeouts as `FanlineError::Timeout`.
    async fn fetch(&self, url: &str, accept: Option<&str>) -> Result<Vec<u8>>;
}
