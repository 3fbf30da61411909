use std::collections::HashMap;
use std::sync::Arc;

use feed_rs::model::Entry;
use feed_rs::parser;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::app::{FanlineError, Result};
use crate::domain::{Account, Attachment, ItemOutcome, Post, SkipReason};

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse an account's feed into the account's profile and one outcome per item.
    ///
    /// Items without a publication date are reported as skipped; the rest of
    /// the feed is still used.
    pub fn normalize(
        &self,
        account_url: &str,
        body: &[u8],
    ) -> Result<(Arc<Account>, Vec<ItemOutcome>)> {
        let feed = parser::parse(body).map_err(|e| FanlineError::FeedParse(e.to_string()))?;

        let account = Arc::new(Account {
            url: account_url.to_string(),
            name: feed.title.map(|t| t.content),
            avatar: feed.logo.map(|image| image.uri),
        });

        let mediums = media_mediums(body);
        let items = feed
            .entries
            .into_iter()
            .map(|entry| to_outcome(&account, entry, &mediums))
            .collect();

        Ok((account, items))
    }
}

fn to_outcome(
    account: &Arc<Account>,
    entry: Entry,
    mediums: &HashMap<String, String>,
) -> ItemOutcome {
    let url = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_else(|| entry.id.clone());

    let Some(published_at) = entry.published else {
        return ItemOutcome::Skipped {
            url,
            reason: SkipReason::MissingPubDate,
        };
    };

    let body = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .unwrap_or_default();

    let mut post = Post::new(account.clone(), url, published_at, body);
    post.attachments = entry
        .media
        .iter()
        .flat_map(|media| media.content.iter())
        .filter_map(|content| {
            let url = content.url.as_ref()?.to_string();
            let medium = mediums.get(&url).cloned().or_else(|| {
                content
                    .content_type
                    .as_ref()
                    .map(|mime| mime.ty().as_str().to_string())
            });
            Some(Attachment::new(url, medium))
        })
        .collect();

    ItemOutcome::Post(post)
}

/// `medium` attributes of namespaced `<*:content>` elements, keyed by URL.
///
/// feed-rs drops the attribute, so the raw XML is scanned for it. URLs are
/// keyed in their parsed form to match what feed-rs reports.
fn media_mediums(body: &[u8]) -> HashMap<String, String> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    let mut mediums = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"content" && e.name().prefix().is_some() =>
            {
                let mut url = None;
                let mut medium = None;
                for attr in e.attributes().flatten() {
                    let Ok(value) = attr.unescape_value() else {
                        continue;
                    };
                    match attr.key.as_ref() {
                        b"url" => url = Some(value.into_owned()),
                        b"medium" => medium = Some(value.into_owned()),
                        _ => {}
                    }
                }
                if let (Some(url), Some(medium)) = (url, medium) {
                    let key = url::Url::parse(&url).map(|u| u.to_string()).unwrap_or(url);
                    mediums.insert(key, medium);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    mediums
}
