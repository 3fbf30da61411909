//! Static HTML pages for the harvested timeline.
//!
//! Posts are ordered newest first and split into pages of `page_size`.
//! Page 1 is `statuses.html`, later pages are `statuses2.html`,
//! `statuses3.html` and so on; every page ends with links to all pages.

pub mod sanitize;
pub mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use maud::html;

use crate::app::Result;
use crate::config::RenderConfig;
use crate::domain::Post;

use sanitize::Sanitizer;
use templates::{Layout, PageIndex, StatusCard};

pub const PAGE_BASENAME: &str = "statuses";

pub const DEFAULT_STYLESHEET: &str = "style.css";
const BUNDLED_STYLESHEET: &str = include_str!("../../assets/style.css");

/// File name for a 1-based page number.
pub fn page_filename(number: usize) -> String {
    if number <= 1 {
        format!("{}.html", PAGE_BASENAME)
    } else {
        format!("{}{}.html", PAGE_BASENAME, number)
    }
}

/// Inverse of [`page_filename`] for numbered pages (2 and up).
fn numbered_page(filename: &str) -> Option<usize> {
    filename
        .strip_prefix(PAGE_BASENAME)?
        .strip_suffix(".html")?
        .parse()
        .ok()
        .filter(|number| *number >= 2)
}

/// Newest first. Equal timestamps keep their input order.
pub fn sort_newest_first(posts: &[Post]) -> Vec<&Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    sorted
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub filename: String,
    pub html: String,
}

pub struct Renderer {
    page_size: usize,
    stylesheet: String,
    sanitizer: Sanitizer,
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            page_size: config.page_size.max(1),
            stylesheet: config.stylesheet.clone(),
            sanitizer: Sanitizer::relaxed(),
        }
    }

    /// Build every page in memory. An empty timeline still yields one page.
    pub fn render(&self, posts: &[Post]) -> Vec<RenderedPage> {
        let sorted = sort_newest_first(posts);
        let chunks: Vec<&[&Post]> = if sorted.is_empty() {
            vec![&sorted[..]]
        } else {
            sorted.chunks(self.page_size).collect()
        };
        let total_pages = chunks.len();
        let layout = Layout {
            stylesheet: &self.stylesheet,
        };

        chunks
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| {
                let number = index + 1;
                let content = html! {
                    @for post in chunk.iter().copied() {
                        (StatusCard { post, sanitizer: &self.sanitizer })
                    }
                    (PageIndex { total_pages })
                };

                RenderedPage {
                    filename: page_filename(number),
                    html: layout.render(content).into_string(),
                }
            })
            .collect()
    }

    /// Render and write all pages into `dir`, replacing earlier files and
    /// removing numbered pages a previous, longer run left behind.
    pub fn write(&self, dir: &Path, posts: &[Post]) -> Result<Vec<PathBuf>> {
        let pages = self.render(posts);
        let mut written = Vec::with_capacity(pages.len());

        for page in pages {
            let path = dir.join(&page.filename);
            fs::write(&path, page.html)?;
            written.push(path);
        }

        self.remove_stale_pages(dir, written.len())?;
        self.ensure_stylesheet(dir)?;
        tracing::info!(pages = written.len(), posts = posts.len(), "Rendered timeline");
        Ok(written)
    }

    fn remove_stale_pages(&self, dir: &Path, total_pages: usize) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let stale = entry
                .file_name()
                .to_str()
                .and_then(numbered_page)
                .is_some_and(|number| number > total_pages);
            if stale {
                tracing::debug!(path = %entry.path().display(), "Removing stale page");
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Drop the bundled stylesheet next to the pages unless one is there already.
    fn ensure_stylesheet(&self, dir: &Path) -> Result<()> {
        if self.stylesheet != DEFAULT_STYLESHEET {
            return Ok(());
        }

        let path = dir.join(DEFAULT_STYLESHEET);
        if !path.exists() {
            fs::write(&path, BUNDLED_STYLESHEET)?;
        }
        Ok(())
    }
}
