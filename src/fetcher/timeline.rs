use std::io::{self, Write};
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::domain::{AccountOutcome, ItemOutcome, Post, SkipReason};
use crate::fetcher::{Fetcher, RSS_ACCEPT};
use crate::normalizer::Normalizer;

/// Everything collected from one pass over the candidate accounts.
#[derive(Debug, Default)]
pub struct Harvest {
    pub posts: Vec<Post>,
    /// (profile URL, reason) for accounts whose feed could not be used.
    pub skipped_accounts: Vec<(String, SkipReason)>,
    /// (post URL, reason) for individual feed items that were dropped.
    pub skipped_items: Vec<(String, SkipReason)>,
}

/// Feed location for a profile URL.
pub fn feed_url(profile_url: &str) -> String {
    format!("{}.rss", profile_url)
}

/// Fetches account feeds one after another.
pub struct TimelineHarvester {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    shuffle: bool,
}

impl TimelineHarvester {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        normalizer: Normalizer,
        shuffle: bool,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            shuffle,
        }
    }

    /// Fetch and parse a single account's feed. Never fails; problems come
    /// back as `AccountOutcome::Skipped`.
    pub async fn fetch_account(&self, profile_url: &str) -> AccountOutcome {
        let body = match self
            .fetcher
            .fetch(&feed_url(profile_url), Some(RSS_ACCEPT))
            .await
        {
            Ok(body) => body,
            Err(e) => return AccountOutcome::Skipped(e.into()),
        };

        match self.normalizer.normalize(profile_url, &body) {
            Ok((account, items)) => AccountOutcome::Fetched { account, items },
            Err(e) => AccountOutcome::Skipped(e.into()),
        }
    }

    /// Visit every account (shuffled unless disabled) and gather their posts.
    pub async fn harvest(&self, mut accounts: Vec<String>) -> Harvest {
        if self.shuffle {
            accounts.shuffle(&mut rand::thread_rng());
        }

        let total = accounts.len();
        let mut harvest = Harvest::default();

        for (index, profile_url) in accounts.into_iter().enumerate() {
            print!("fetching {} [{}/{}]", feed_url(&profile_url), index + 1, total);
            let _ = io::stdout().flush();

            match self.fetch_account(&profile_url).await {
                AccountOutcome::Skipped(reason) => {
                    println!(" ({})", reason);
                    tracing::debug!(url = %profile_url, %reason, "Skipping account");
                    harvest.skipped_accounts.push((profile_url, reason));
                }
                AccountOutcome::Fetched { items, .. } => {
                    println!();
                    for item in items {
                        match item {
                            ItemOutcome::Post(post) => harvest.posts.push(post),
                            ItemOutcome::Skipped { url, reason } => {
                                println!("  {} for status {}", reason, url);
                                tracing::warn!(url = %url, %reason, "Skipping status");
                                harvest.skipped_items.push((url, reason));
                            }
                        }
                    }
                }
            }
        }

        harvest
    }
}
