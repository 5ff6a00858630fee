//! Mock 时间线客户端，不发起真实 HTTP 请求。
//!
//! ```rust
//! use enrichr_bot::testing::MockFeed;
//! use enrichr_bot::twitter::{FeedClient, RawPost, TimelineQuery};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let feed = MockFeed::new().with_posts(vec![RawPost::new("1", 100, "hello")]);
//! let posts = feed.fetch_timeline(&TimelineQuery::bootstrap("SbotGwa")).await.unwrap();
//! assert_eq!(posts.len(), 1);
//! assert_eq!(feed.queries()[0].count, 1);
//! # }
//! ```

use crate::error::{BotError, FeedError, Result};
use crate::twitter::{FeedClient, RawPost, TimelineQuery};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum MockFeedResponse {
    Posts(Vec<RawPost>),
    Err(BotError),
}

/// 可脚本化的 Mock 时间线。
///
/// 按顺序返回预设响应；队列耗尽后返回空列表。所有查询都被记录。
pub struct MockFeed {
    responses: Arc<Mutex<VecDeque<MockFeedResponse>>>,
    queries: Arc<Mutex<Vec<TimelineQuery>>>,
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeed {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 追加一批帖子
    pub fn with_posts(self, posts: Vec<RawPost>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockFeedResponse::Posts(posts));
        self
    }

    pub fn with_error(self, err: BotError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockFeedResponse::Err(err));
        self
    }

    /// 追加一条网络错误
    pub fn with_network_error(self, msg: impl Into<String>) -> Self {
        self.with_error(BotError::Feed(FeedError::NetworkError(msg.into())))
    }

    /// 所有收到的查询（按时序）
    pub fn queries(&self) -> Vec<TimelineQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl FeedClient for MockFeed {
    async fn fetch_timeline(&self, query: &TimelineQuery) -> Result<Vec<RawPost>> {
        self.queries.lock().unwrap().push(query.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(MockFeedResponse::Posts(posts)) => Ok(posts),
            Some(MockFeedResponse::Err(e)) => Err(e),
            None => Ok(Vec::new()),
        }
    }
}
