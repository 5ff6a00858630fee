//! Twitter 接入层
//!
//! 读和写是两套独立的能力接口：
//!
//! | 接口 | 默认实现 | 鉴权 |
//! |------|----------|------|
//! | [`FeedClient`] | [`TwitterFeedClient`] | 应用级 OAuth2 bearer token |
//! | [`Publisher`] | [`TwitterPublisher`] | 用户级 OAuth 1.0a 签名 |
//!
//! 两者各自构造，可分别替换为 [`crate::testing`] 中的 mock。

mod client;
pub mod oauth;
pub mod types;

pub use client::{TwitterFeedClient, TwitterPublisher};
pub use types::{MediaRef, RawPost, TimelineQuery};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// 只读的时间线接口
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// 按查询参数拉取一批帖子（最新的在前）
    async fn fetch_timeline(&self, query: &TimelineQuery) -> Result<Vec<RawPost>>;
}

/// 可写的发布接口
#[async_trait]
pub trait Publisher: Send + Sync {
    /// 上传单个媒体文件
    async fn upload_media(&self, path: &Path) -> Result<MediaRef>;

    /// 以回复形式发布一条状态，附带已上传的媒体
    async fn submit_reply(
        &self,
        status: &str,
        in_reply_to_id: &str,
        media: &[MediaRef],
    ) -> Result<()>;
}
