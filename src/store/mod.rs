pub mod snapshot;

use crate::app::Result;
use crate::domain::Post;

pub use snapshot::SnapshotStore;

/// Whole-collection persistence for one run's posts.
pub trait Store {
    /// Replace whatever was stored before with `posts`.
    fn save(&self, posts: &[Post]) -> Result<()>;
    fn load(&self) -> Result<Vec<Post>>;
}
