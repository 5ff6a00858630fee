//! Twitter v1.1 REST 类型定义

use crate::error::FeedError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Twitter `created_at` 字段格式，例如 `Wed Oct 10 20:19:24 +0000 2018`
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// 时间线中的单条原始帖子
///
/// 只声明流程需要的字段，其余字段原样保存在 `extra` 中，
/// 写入 checkpoint 时得到完整的原始帖子。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawPost {
    pub id_str: String,
    pub created_at: String,
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawPost {
    pub fn new(id: impl Into<String>, created_at: i64, text: impl Into<String>) -> Self {
        Self {
            id_str: id.into(),
            created_at: format_created_at(created_at),
            text: text.into(),
            extra: Map::new(),
        }
    }

    /// 创建时间（Unix 秒）
    pub fn created_at_epoch(&self) -> Result<i64, FeedError> {
        parse_created_at(&self.created_at)
    }
}

/// 时间线查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineQuery {
    pub handle: String,
    /// 只返回比该 id 更新的帖子
    pub since_id: Option<String>,
    pub count: u32,
    pub exclude_replies: bool,
    pub include_reposts: bool,
}

impl TimelineQuery {
    /// 首次运行：只取最新一条
    pub fn bootstrap(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            since_id: None,
            count: 1,
            exclude_replies: true,
            include_reposts: false,
        }
    }

    /// 增量运行：取 `since_id` 之后的帖子
    pub fn since(handle: impl Into<String>, since_id: impl Into<String>, count: u32) -> Self {
        Self {
            handle: handle.into(),
            since_id: Some(since_id.into()),
            count,
            exclude_replies: true,
            include_reposts: false,
        }
    }
}

/// 上传后得到的媒体引用（`media_id_string`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef(pub String);

impl MediaRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaUploadResponse {
    pub media_id_string: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BearerTokenResponse {
    pub token_type: String,
    pub access_token: String,
}

pub fn parse_created_at(value: &str) -> Result<i64, FeedError> {
    DateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .map(|dt| dt.timestamp())
        .map_err(|e| FeedError::InvalidTimestamp(format!("{value}: {e}")))
}

pub fn format_created_at(epoch: i64) -> String {
    Utc.timestamp_opt(epoch, 0)
        .single()
        .unwrap_or_default()
        .format(CREATED_AT_FORMAT)
        .to_string()
}
