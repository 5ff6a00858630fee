pub mod bot;
pub mod checkpoint;
pub mod collector;
pub mod config;
pub mod error;
pub mod extractor;
pub mod lookup;
pub mod reply;
pub mod testing;
pub mod twitter;

pub mod prelude {
    pub use crate::bot::{Bot, RunMode, RunOutcome, RunStage};
    pub use crate::checkpoint::{CheckpointRecord, CheckpointStore, DirCheckpointStore};
    pub use crate::config::Config;
    pub use crate::error::{BotError, Result};
    pub use crate::lookup::{Dataset, LookupEntry};
    pub use crate::reply::ReplyRequest;
    pub use crate::twitter::{FeedClient, Publisher, TwitterFeedClient, TwitterPublisher};
}
