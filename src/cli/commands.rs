use std::path::{Path, PathBuf};

use crate::app::{AppContext, Result};
use crate::config::{Config, ConfigError};
use crate::domain::{ActorUrl, Post};
use crate::render::page_filename;
use crate::server;
use crate::store::Store;

/// Counts from one pipeline run, printed once pages are written.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub candidates: usize,
    pub posts: usize,
    pub skipped_accounts: usize,
    pub skipped_items: usize,
    pub pages: Vec<PathBuf>,
}

/// Explicit path, else the default location; no config dir at all means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from(path)?),
        None => match Config::load() {
            Ok(config) => Ok(config),
            Err(ConfigError::NoConfigDir) => {
                tracing::warn!("No config directory found, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        },
    }
}

/// Resolve candidates, harvest their feeds, write the snapshot, render pages.
pub async fn build(ctx: &AppContext, actor: &ActorUrl) -> Result<BuildReport> {
    let candidates = ctx.resolver.resolve(actor).await?;
    let candidate_count = candidates.len();
    println!("{} followers you don't follow back", candidate_count);

    let harvest = ctx.harvester.harvest(candidates).await;
    ctx.snapshot.save(&harvest.posts)?;
    let pages = render(ctx, &harvest.posts)?;

    Ok(BuildReport {
        candidates: candidate_count,
        posts: harvest.posts.len(),
        skipped_accounts: harvest.skipped_accounts.len(),
        skipped_items: harvest.skipped_items.len(),
        pages,
    })
}

/// Render pages from the snapshot a previous run left behind.
pub fn rebuild_from_snapshot(ctx: &AppContext) -> Result<BuildReport> {
    let posts = ctx.snapshot.load()?;
    println!(
        "loaded {} statuses from {}",
        posts.len(),
        ctx.snapshot.path().display()
    );
    let pages = render(ctx, &posts)?;

    Ok(BuildReport {
        posts: posts.len(),
        pages,
        ..Default::default()
    })
}

pub fn render(ctx: &AppContext, posts: &[Post]) -> Result<Vec<PathBuf>> {
    ctx.renderer.write(&ctx.output_dir, posts)
}

pub fn print_report(report: &BuildReport) {
    println!();
    println!(
        "{} statuses on {} pages ({} accounts skipped, {} statuses skipped)",
        report.posts,
        report.pages.len(),
        report.skipped_accounts,
        report.skipped_items
    );
}

/// Serve the output directory until Ctrl-C.
pub async fn serve(ctx: &AppContext, open_browser: bool) -> Result<()> {
    let listener = server::bind(ctx.config.server.addr()).await?;
    let url = ctx.config.server.browse_url(&page_filename(1));

    println!();
    println!("open the following URL to view statuses:");
    println!();
    println!("  {}", url);
    println!();

    if open_browser {
        if let Err(e) = open::that(&url) {
            tracing::warn!(url = %url, "Could not open browser: {}", e);
        }
    }

    server::serve_until(listener, &ctx.output_dir, server::shutdown_signal()).await
}
