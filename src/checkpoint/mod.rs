//! 已见帖子的持久化
//!
//! 每条帖子一条 [`CheckpointRecord`]，创建后只读。
//! `created_at` 最大的记录即为下一次增量拉取的起点。
//!
//! ```rust,no_run
//! use enrichr_bot::checkpoint::{CheckpointStore, DirCheckpointStore};
//!
//! # async fn example() -> enrichr_bot::error::Result<()> {
//! let store = DirCheckpointStore::open("/var/lib/enrichrbot/tweets")?;
//! if let Some(latest) = store.latest().await? {
//!     println!("resume after {}", latest.id);
//! }
//! # Ok(())
//! # }
//! ```

mod record;
pub mod store;

pub use record::CheckpointRecord;
pub use store::{CheckpointStore, DirCheckpointStore, InMemoryCheckpointStore};
