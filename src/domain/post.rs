use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Account;

/// A single status taken from an account's feed.
///
/// Field names on the wire (`user`, `date`, `text`) match the snapshot
/// format, with `date` stored as unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "user")]
    pub author: Arc<Account>,
    pub url: String,
    #[serde(rename = "date", with = "chrono::serde::ts_seconds")]
    pub published_at: DateTime<Utc>,
    #[serde(rename = "text")]
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Post {
    pub fn new(
        author: Arc<Account>,
        url: impl Into<String>,
        published_at: DateTime<Utc>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            author,
            url: url.into(),
            published_at,
            body: body.into(),
            attachments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
}

impl Attachment {
    pub fn new(url: impl Into<String>, medium: Option<String>) -> Self {
        Self {
            url: url.into(),
            medium,
        }
    }

    pub fn is_video(&self) -> bool {
        self.medium.as_deref() == Some("video")
    }
}
