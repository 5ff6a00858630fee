//! 时间线增量采集
//!
//! 存储为空时只取最新一条（不回溯历史）；否则拉取最新 checkpoint 之后的
//! 帖子，单批最多 [`BATCH_SIZE`] 条。拉取失败只记录日志，本轮按零条新帖继续。

use crate::checkpoint::{CheckpointRecord, CheckpointStore};
use crate::error::Result;
use crate::twitter::{FeedClient, TimelineQuery};
use std::sync::Arc;
use tracing::{info, warn};

pub const BATCH_SIZE: u32 = 200;

pub struct TimelineCollector {
    feed: Arc<dyn FeedClient>,
    store: Arc<dyn CheckpointStore>,
}

impl TimelineCollector {
    pub fn new(feed: Arc<dyn FeedClient>, store: Arc<dyn CheckpointStore>) -> Self {
        Self { feed, store }
    }

    /// 拉取并保存新帖子，返回本轮新写入的记录
    pub async fn collect(&self, handle: &str) -> Result<Vec<CheckpointRecord>> {
        info!(handle, "🔎 检查新帖子...");
        let query = match self.store.latest().await? {
            Some(latest) => TimelineQuery::since(handle, latest.id, BATCH_SIZE),
            None => {
                info!(handle, "checkpoint 为空，进入 bootstrap 模式");
                TimelineQuery::bootstrap(handle)
            }
        };

        let posts = match self.feed.fetch_timeline(&query).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(handle, error = %e, "时间线拉取失败，沿用已有 checkpoint");
                return Ok(Vec::new());
            }
        };

        let mut collected = Vec::with_capacity(posts.len());
        for post in &posts {
            let record = match CheckpointRecord::from_post(post) {
                Ok(record) => record,
                Err(e) => {
                    warn!(id = %post.id_str, error = %e, "跳过无法解析的帖子");
                    continue;
                }
            };
            if self.store.append(&record).await? {
                collected.push(record);
            }
        }

        info!(handle, new_posts = collected.len(), "采集完成");
        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::{DirCheckpointStore, InMemoryCheckpointStore};
    use crate::testing::MockFeed;
    use crate::twitter::RawPost;

    #[tokio::test]
    async fn test_bootstrap_requests_single_post() -> Result<()> {
        let feed = Arc::new(MockFeed::new().with_posts(vec![RawPost::new("1", 100, "a")]));
        let store = Arc::new(InMemoryCheckpointStore::new());
        let collector = TimelineCollector::new(feed.clone(), store.clone());

        let collected = collector.collect("SbotGwa").await?;
        assert_eq!(collected.len(), 1);

        let queries = feed.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0], TimelineQuery::bootstrap("SbotGwa"));
        assert_eq!(queries[0].count, 1);
        assert!(queries[0].since_id.is_none());
        assert_eq!(store.latest().await?.unwrap().id, "1");
        Ok(())
    }

    #[tokio::test]
    async fn test_incremental_uses_latest_id() -> Result<()> {
        let feed = Arc::new(MockFeed::new().with_posts(vec![
            RawPost::new("12", 120, "newest"),
            RawPost::new("11", 110, "newer"),
        ]));
        let store = Arc::new(InMemoryCheckpointStore::with_records([
            CheckpointRecord::new("9", 9, "x"),
            CheckpointRecord::new("10", 10, "y"),
        ]));
        let collector = TimelineCollector::new(feed.clone(), store.clone());

        let collected = collector.collect("SbotGwa").await?;
        let ids: Vec<&str> = collected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["12", "11"]);

        let query = &feed.queries()[0];
        assert_eq!(query.since_id.as_deref(), Some("10"));
        assert_eq!(query.count, BATCH_SIZE);
        assert!(query.exclude_replies);
        assert!(!query.include_reposts);
        assert_eq!(store.latest().await?.unwrap().id, "12");
        Ok(())
    }

    #[tokio::test]
    async fn test_feed_error_is_absorbed() -> Result<()> {
        let feed = Arc::new(MockFeed::new().with_network_error("connection reset"));
        let store = Arc::new(InMemoryCheckpointStore::with_records([CheckpointRecord::new(
            "5", 5, "keep",
        )]));
        let collector = TimelineCollector::new(feed, store.clone());

        let collected = collector.collect("SbotGwa").await?;
        assert!(collected.is_empty());
        assert_eq!(store.latest().await?.unwrap().id, "5");
        Ok(())
    }

    #[tokio::test]
    async fn test_same_second_posts_report_only_stored() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let feed = Arc::new(MockFeed::new().with_posts(vec![
            RawPost::new("A", 100, "first"),
            RawPost::new("B", 100, "second"),
        ]));
        let store = Arc::new(DirCheckpointStore::open(dir.path())?);
        let collector = TimelineCollector::new(feed, store.clone());

        let collected = collector.collect("SbotGwa").await?;
        let collected_ids: Vec<String> = collected.into_iter().map(|r| r.id).collect();
        let stored_ids: Vec<String> = store.all().await?.into_iter().map(|r| r.id).collect();
        assert_eq!(collected_ids, vec!["A"]);
        assert_eq!(collected_ids, stored_ids);
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_timestamp_skipped() -> Result<()> {
        let mut bad = RawPost::new("2", 0, "bad");
        bad.created_at = "yesterday".to_string();
        let feed = Arc::new(
            MockFeed::new().with_posts(vec![bad, RawPost::new("3", 300, "good")]),
        );
        let store = Arc::new(InMemoryCheckpointStore::new());
        let collector = TimelineCollector::new(feed, store.clone());

        let collected = collector.collect("SbotGwa").await?;
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].id, "3");
        Ok(())
    }
}
