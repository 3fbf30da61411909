use std::fs;
use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fanline::app::AppContext;
use fanline::cli::commands;
use fanline::config::Config;
use fanline::domain::ActorUrl;
use fanline::fetcher::http_fetcher::HttpFetcher;
use fanline::store::Store;

fn feed(server: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Alice</title>
    <link>{server}/@alice</link>
    <item>
      <link>{server}/@alice/101</link>
      <pubDate>Tue, 02 Jan 2024 09:30:00 +0000</pubDate>
      <description>&lt;p&gt;hello&lt;script&gt;bad()&lt;/script&gt;&lt;/p&gt;</description>
    </item>
    <item>
      <link>{server}/@alice/102</link>
      <description>no date here</description>
    </item>
  </channel>
</rss>"#
    )
}

async fn mount_collection(server: &MockServer, collection: &str, items: Vec<String>) {
    Mock::given(method("GET"))
        .and(path(format!("/@me/{}.json", collection)))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "orderedItems": items,
        })))
        .mount(server)
        .await;
}

fn context(dir: &std::path::Path) -> AppContext {
    let mut config = Config::default();
    config.fetch.shuffle = false;
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5), "fanline-test").unwrap();
    AppContext::with_fetcher(config, Arc::new(fetcher), dir.to_path_buf())
}

#[tokio::test]
async fn test_build_writes_snapshot_and_pages() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let alice = format!("{}/@alice", uri);
    let bob = format!("{}/@bob", uri);

    mount_collection(&server, "followers", vec![alice.clone(), bob.clone()]).await;
    mount_collection(&server, "following", vec![bob.clone()]).await;
    Mock::given(method("GET"))
        .and(path("/@alice.rss"))
        .and(header("accept", "application/rss+xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed(&uri)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/@bob.rss"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    let actor: ActorUrl = format!("{}/@me", uri).parse().unwrap();

    let report = commands::build(&ctx, &actor).await.unwrap();

    assert_eq!(report.candidates, 1);
    assert_eq!(report.posts, 1);
    assert_eq!(report.skipped_items, 1);
    assert_eq!(report.pages, vec![dir.path().join("statuses.html")]);

    let raw = fs::read_to_string(dir.path().join("statuses.json")).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = snapshot.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["url"], format!("{}/@alice/101", uri));
    assert_eq!(entries[0]["date"], 1704187800);
    assert_eq!(entries[0]["user"]["url"], alice);

    let html = fs::read_to_string(dir.path().join("statuses.html")).unwrap();
    assert_eq!(html.matches(r#"class="status""#).count(), 1);
    assert!(html.contains("<p>hello</p>"));
    assert!(!html.contains("bad()"));
    assert!(dir.path().join("style.css").exists());
}

#[tokio::test]
async fn test_rebuild_from_snapshot_renders_saved_posts() {
    let server = MockServer::start().await;
    let uri = server.uri();

    mount_collection(&server, "followers", vec![format!("{}/@alice", uri)]).await;
    mount_collection(&server, "following", vec![]).await;
    Mock::given(method("GET"))
        .and(path("/@alice.rss"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed(&uri)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    let actor: ActorUrl = format!("{}/@me", uri).parse().unwrap();
    commands::build(&ctx, &actor).await.unwrap();

    fs::remove_file(dir.path().join("statuses.html")).unwrap();
    let report = commands::rebuild_from_snapshot(&ctx).unwrap();

    assert_eq!(report.posts, 1);
    assert_eq!(ctx.snapshot.load().unwrap().len(), 1);
    let html = fs::read_to_string(dir.path().join("statuses.html")).unwrap();
    assert!(html.contains(&format!("{}/@alice/101", uri)));
}

#[tokio::test]
async fn test_failed_collection_aborts_before_writing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@me/followers.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    let actor: ActorUrl = format!("{}/@me", server.uri()).parse().unwrap();

    assert!(commands::build(&ctx, &actor).await.is_err());
    assert!(!dir.path().join("statuses.json").exists());
    assert!(!dir.path().join("statuses.html").exists());
}
