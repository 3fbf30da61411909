use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::app::Result;
use crate::domain::Post;
use crate::store::Store;

pub const SNAPSHOT_FILE: &str = "statuses.json";

/// JSON array of posts in a single file, rewritten in full on every save.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for SnapshotStore {
    fn save(&self, posts: &[Post]) -> Result<()> {
        // Written beside the target, then renamed into place.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, posts)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = posts.len(), "Wrote snapshot");
        Ok(())
    }

    fn load(&self) -> Result<Vec<Post>> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
