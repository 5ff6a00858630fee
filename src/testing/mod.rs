//! 测试替身
//!
//! 在不访问 Twitter 的情况下测试采集与发布流程：
//!
//! - [`MockFeed`]：按顺序返回预设的时间线批次，并记录每次查询
//! - [`MockPublisher`]：记录上传与提交，可预设失败
//!
//! ```rust
//! use enrichr_bot::testing::MockPublisher;
//! use enrichr_bot::twitter::Publisher;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let publisher = MockPublisher::new();
//! publisher.submit_reply("@SbotGwa hi", "101", &[]).await.unwrap();
//! assert_eq!(publisher.submit_count(), 1);
//! assert_eq!(publisher.upload_count(), 0);
//! # }
//! ```

mod mock_feed;
mod mock_publisher;

pub use mock_feed::MockFeed;
pub use mock_publisher::{MockPublisher, SubmittedReply};
