use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum FanlineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("Failed to fetch {url}: {source}")]
    Collection {
        url: String,
        #[source]
        source: Box<FanlineError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid actor URL: {0}")]
    InvalidActor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FanlineError {
    /// Attach the collection page URL that was being fetched.
    pub fn in_collection(self, url: impl Into<String>) -> Self {
        FanlineError::Collection {
            url: url.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FanlineError>;
