use std::fmt;
use std::sync::Arc;

use crate::app::FanlineError;

use super::{Account, Post};

/// Why an account or a single feed item was left out of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The feed answered with a non-success status.
    Status(u16),
    Timeout,
    /// Any other transport-level failure.
    Fetch(String),
    /// The feed body could not be parsed.
    Parse(String),
    MissingPubDate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Status(status) => write!(f, "failed {}", status),
            SkipReason::Timeout => write!(f, "timed out"),
            SkipReason::Fetch(message) => write!(f, "{}", message),
            SkipReason::Parse(message) => write!(f, "unreadable feed: {}", message),
            SkipReason::MissingPubDate => write!(f, "no pubDate"),
        }
    }
}

impl From<FanlineError> for SkipReason {
    fn from(err: FanlineError) -> Self {
        match err {
            FanlineError::Status { status, .. } => SkipReason::Status(status),
            FanlineError::Timeout { .. } => SkipReason::Timeout,
            FanlineError::FeedParse(message) => SkipReason::Parse(message),
            other => SkipReason::Fetch(other.to_string()),
        }
    }
}

/// Result of turning one feed item into a post.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Post(Post),
    Skipped { url: String, reason: SkipReason },
}

/// Result of fetching one account's feed.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountOutcome {
    Fetched {
        account: Arc<Account>,
        items: Vec<ItemOutcome>,
    },
    Skipped(SkipReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_becomes_status_reason() {
        let err = FanlineError::Status {
            url: "https://example.social/@a.rss".into(),
            status: 404,
        };
        assert_eq!(SkipReason::from(err), SkipReason::Status(404));
    }

    #[test]
    fn test_timeout_error_becomes_timeout_reason() {
        let err = FanlineError::Timeout {
            url: "https://example.social/@a.rss".into(),
        };
        assert_eq!(SkipReason::from(err), SkipReason::Timeout);
    }

    #[test]
    fn test_other_errors_keep_message() {
        let err = FanlineError::InvalidActor("nope".into());
        assert_eq!(
            SkipReason::from(err),
            SkipReason::Fetch("Invalid actor URL: nope".into())
        );
    }

    #[test]
    fn test_display_matches_progress_annotations() {
        assert_eq!(SkipReason::Status(503).to_string(), "failed 503");
        assert_eq!(SkipReason::Timeout.to_string(), "timed out");
        assert_eq!(SkipReason::MissingPubDate.to_string(), "no pubDate");
    }
}
