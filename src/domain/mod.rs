pub mod account;
pub mod actor;
pub mod outcome;
pub mod post;

pub use account::Account;
pub use actor::ActorUrl;
pub use outcome::{AccountOutcome, ItemOutcome, SkipReason};
pub use post::{Attachment, Post};
