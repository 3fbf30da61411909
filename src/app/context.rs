use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::timeline::TimelineHarvester;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::render::Renderer;
use crate::resolver::FollowerResolver;
use crate::store::SnapshotStore;

pub struct AppContext {
    pub config: Config,
    pub resolver: FollowerResolver,
    pub harvester: TimelineHarvester,
    pub snapshot: SnapshotStore,
    pub renderer: Renderer,
    /// Where the snapshot and pages are written and what the server serves.
    pub output_dir: PathBuf,
}

impl AppContext {
    /// Real HTTP, writing into the current directory.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetch)?);
        let output_dir = std::env::current_dir()?;
        Ok(Self::with_fetcher(config, fetcher, output_dir))
    }

    pub fn with_fetcher(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        output_dir: PathBuf,
    ) -> Self {
        let resolver = FollowerResolver::new(fetcher.clone());
        let harvester = TimelineHarvester::new(fetcher, Normalizer::new(), config.fetch.shuffle);
        let snapshot = SnapshotStore::in_dir(&output_dir);
        let renderer = Renderer::new(&config.render);

        Self {
            config,
            resolver,
            harvester,
            snapshot,
            renderer,
            output_dir,
        }
    }
}
