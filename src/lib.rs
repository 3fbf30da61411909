//! # Fanline
//!
//! A local timeline of the people who follow you but whom you don't follow
//! back.
//!
//! ## Architecture
//!
//! One run is a straight pipeline:
//!
//! ```text
//! Resolver → Fetcher → Normalizer → Store → Render → Server
//! ```
//!
//! - [`resolver`]: Pages through followers/following and subtracts them
//! - [`fetcher`]: Fetches each remaining account's RSS feed
//! - [`normalizer`]: Turns feed items into posts
//! - [`store`]: Writes the `statuses.json` snapshot
//! - [`render`]: Writes paginated `statuses*.html` pages
//! - [`server`]: Serves the output directory until Ctrl-C
//!
//! ## Quick Start
//!
//! ```bash
//! # Build the timeline and serve it on http://127.0.0.1:8000/statuses.html
//! fanline https://example.social/@you
//!
//! # Re-render from the last snapshot without fetching anything
//! fanline --from-snapshot --no-serve
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// resolver, harvester, snapshot store, renderer.
pub mod app;

/// Command-line interface using clap, and the pipeline steps it drives.
pub mod cli;

/// Configuration loaded from `~/.config/fanline/config.toml`.
///
/// Covers fetch timeout and user agent, page size and stylesheet,
/// and the address the server binds.
pub mod config;

/// Core domain models.
///
/// - [`Account`](domain::Account): Feed author (URL, name, avatar)
/// - [`Post`](domain::Post): One dated status with attachments
/// - [`ActorUrl`](domain::ActorUrl): Validated profile URL
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for fetching bytes
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`TimelineHarvester`](fetcher::timeline::TimelineHarvester): Walks candidate accounts
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS/Atom feeds into [`Post`](domain::Post) structs.
pub mod normalizer;

/// HTML page rendering with maud, plus the post body sanitizer.
pub mod render;

/// Follower/following collection paging and subtraction.
pub mod resolver;

/// Static file server for the rendered pages.
pub mod server;

/// Snapshot persistence.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SnapshotStore`](store::SnapshotStore): JSON file implementation
pub mod store;
