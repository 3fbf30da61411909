//! Works out which followers of an actor the actor does not follow back.
//!
//! Both collections are read page by page from
//! `{actor}/followers.json?page=N` and `{actor}/following.json?page=N`,
//! starting at page 1 and continuing while a page carries `next`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::app::{FanlineError, Result};
use crate::domain::ActorUrl;
use crate::fetcher::Fetcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Followers,
    Following,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Followers => "followers",
            Collection::Following => "following",
        }
    }

    pub fn page_url(self, actor: &ActorUrl, page: u32) -> String {
        format!("{}/{}.json?page={}", actor, self.name(), page)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One page of an ordered collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage {
    #[serde(default)]
    pub ordered_items: Vec<CollectionItem>,
    #[serde(default)]
    pub next: Option<Value>,
}

/// Collections list bare ids; some servers embed objects instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CollectionItem {
    Id(String),
    Object { id: String },
}

impl CollectionItem {
    pub fn into_id(self) -> String {
        match self {
            CollectionItem::Id(id) | CollectionItem::Object { id } => id,
        }
    }
}

impl CollectionPage {
    pub fn has_next(&self) -> bool {
        !matches!(self.next, None | Some(Value::Bool(false)))
    }
}

/// Remove one matching follower for every entry in `following`.
///
/// Comparison is exact string equality and the order of `followers` is kept.
pub fn subtract(followers: Vec<String>, following: &[String]) -> Vec<String> {
    let mut pending: HashMap<&str, usize> = HashMap::new();
    for url in following {
        *pending.entry(url.as_str()).or_default() += 1;
    }

    followers
        .into_iter()
        .filter(|url| match pending.get_mut(url.as_str()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

pub struct FollowerResolver {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl FollowerResolver {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self { fetcher }
    }

    /// Read every page of one collection. Any failure aborts with the page URL.
    pub async fn fetch_collection(
        &self,
        actor: &ActorUrl,
        collection: Collection,
    ) -> Result<Vec<String>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            println!("fetching {} page {}...", collection, page);
            let url = collection.page_url(actor, page);

            let body = self
                .fetcher
                .fetch(&url, None)
                .await
                .map_err(|e| e.in_collection(&url))?;
            let parsed: CollectionPage = serde_json::from_slice(&body)
                .map_err(|e| FanlineError::from(e).in_collection(&url))?;

            let more = parsed.has_next();
            items.extend(parsed.ordered_items.into_iter().map(CollectionItem::into_id));

            if !more {
                break;
            }
            page += 1;
        }

        tracing::debug!(%collection, pages = page, count = items.len(), "Fetched collection");
        Ok(items)
    }

    /// Followers of `actor` that `actor` does not follow, in follower order.
    pub async fn resolve(&self, actor: &ActorUrl) -> Result<Vec<String>> {
        let followers = self.fetch_collection(actor, Collection::Followers).await?;
        let following = self.fetch_collection(actor, Collection::Following).await?;

        let total = followers.len();
        let candidates = subtract(followers, &following);
        tracing::info!(
            followers = total,
            following = following.len(),
            candidates = candidates.len(),
            "Resolved followers not followed back"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::fetcher::http_fetcher::HttpFetcher;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_subtract_keeps_order() {
        let result = subtract(strings(&["A", "B", "C"]), &strings(&["B"]));
        assert_eq!(result, strings(&["A", "C"]));
    }

    #[test]
    fn test_subtract_removes_one_per_entry() {
        let result = subtract(strings(&["A", "B", "A", "A"]), &strings(&["A", "A"]));
        assert_eq!(result, strings(&["B", "A"]));
    }

    #[test]
    fn test_subtract_is_exact_match() {
        let result = subtract(
            strings(&["https://a.example/@x", "https://a.example/@y"]),
            &strings(&["https://a.example/@X", "https://a.example/@y/"]),
        );
        assert_eq!(result, strings(&["https://a.example/@x", "https://a.example/@y"]));
    }

    #[test]
    fn test_page_has_next() {
        let page: CollectionPage = serde_json::from_str(
            r#"{"orderedItems": [], "next": "https://x/followers.json?page=2"}"#,
        )
        .unwrap();
        assert!(page.has_next());

        let page: CollectionPage = serde_json::from_str(r#"{"orderedItems": ["a"]}"#).unwrap();
        assert!(!page.has_next());

        let page: CollectionPage =
            serde_json::from_str(r#"{"orderedItems": [], "next": null}"#).unwrap();
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_accepts_embedded_objects() {
        let page: CollectionPage = serde_json::from_str(
            r#"{"orderedItems": ["https://a/@x", {"id": "https://a/@y", "type": "Person"}]}"#,
        )
        .unwrap();
        let ids: Vec<String> = page
            .ordered_items
            .into_iter()
            .map(CollectionItem::into_id)
            .collect();
        assert_eq!(ids, strings(&["https://a/@x", "https://a/@y"]));
    }

    fn resolver() -> FollowerResolver {
        let fetcher =
            HttpFetcher::with_timeout(std::time::Duration::from_secs(5), "fanline-test").unwrap();
        FollowerResolver::new(Arc::new(fetcher))
    }

    async fn mount_page(
        server: &MockServer,
        collection: &str,
        page: &str,
        body: serde_json::Value,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/@me/{}.json", collection)))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_collection_follows_pages_until_no_next() {
        let server = MockServer::start().await;
        let actor: ActorUrl = format!("{}/@me", server.uri()).parse().unwrap();

        mount_page(&server, "followers", "1", serde_json::json!({
            "orderedItems": ["https://a/@1", "https://a/@2"],
            "next": format!("{}/@me/followers.json?page=2", server.uri()),
        }))
        .await;
        mount_page(&server, "followers", "2", serde_json::json!({
            "orderedItems": ["https://a/@3"],
            "next": format!("{}/@me/followers.json?page=3", server.uri()),
        }))
        .await;
        mount_page(&server, "followers", "3", serde_json::json!({
            "orderedItems": ["https://a/@4"],
        }))
        .await;

        let items = resolver()
            .fetch_collection(&actor, Collection::Followers)
            .await
            .unwrap();

        assert_eq!(
            items,
            strings(&["https://a/@1", "https://a/@2", "https://a/@3", "https://a/@4"])
        );
    }

    #[tokio::test]
    async fn test_resolve_subtracts_following() {
        let server = MockServer::start().await;
        let actor: ActorUrl = format!("{}/@me", server.uri()).parse().unwrap();

        mount_page(&server, "followers", "1", serde_json::json!({
            "orderedItems": ["https://a/@A", "https://a/@B", "https://a/@C"],
        }))
        .await;
        mount_page(&server, "following", "1", serde_json::json!({
            "orderedItems": ["https://a/@B", "https://a/@Z"],
        }))
        .await;

        let candidates = resolver().resolve(&actor).await.unwrap();
        assert_eq!(candidates, strings(&["https://a/@A", "https://a/@C"]));
    }

    #[tokio::test]
    async fn test_failed_page_is_fatal_with_url_context() {
        let server = MockServer::start().await;
        let actor: ActorUrl = format!("{}/@me", server.uri()).parse().unwrap();

        mount_page(&server, "followers", "1", serde_json::json!({
            "orderedItems": ["https://a/@A"],
            "next": "more",
        }))
        .await;
        Mock::given(method("GET"))
            .and(path("/@me/followers.json"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = resolver().resolve(&actor).await.unwrap_err();
        match err {
            FanlineError::Collection { url, source } => {
                assert!(url.ends_with("/@me/followers.json?page=2"));
                assert!(matches!(*source, FanlineError::Status { status: 500, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_fatal() {
        let server = MockServer::start().await;
        let actor: ActorUrl = format!("{}/@me", server.uri()).parse().unwrap();

        Mock::given(method("GET"))
            .and(path("/@me/followers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = resolver().resolve(&actor).await.unwrap_err();
        match err {
            FanlineError::Collection { source, .. } => {
                assert!(matches!(*source, FanlineError::Json(_)))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
