use crate::error::FeedError;
use crate::twitter::RawPost;
use serde_json::Value;

/// 一条已见过的帖子
///
/// 写入后不再修改；`raw` 为落盘的完整原始帖子。
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointRecord {
    pub id: String,
    /// 创建时间（Unix 秒），同时是存储键
    pub created_at: i64,
    pub text: String,
    pub raw: Value,
}

impl CheckpointRecord {
    /// 测试用构造：以合成的原始帖子作为 `raw`
    #[cfg(test)]
    pub(crate) fn new(id: impl Into<String>, created_at: i64, text: impl Into<String>) -> Self {
        let post = RawPost::new(id, created_at, text);
        let raw = serde_json::to_value(&post).expect("RawPost serializes to JSON");
        Self {
            id: post.id_str,
            created_at,
            text: post.text,
            raw,
        }
    }

    /// 由时间线中的原始帖子构造，时间戳无法解析时返回错误
    pub fn from_post(post: &RawPost) -> Result<Self, FeedError> {
        let created_at = post.created_at_epoch()?;
        let raw = serde_json::to_value(post)
            .map_err(|e| FeedError::InvalidResponse(e.to_string()))?;
        Ok(Self {
            id: post.id_str.clone(),
            created_at,
            text: post.text.clone(),
            raw,
        })
    }

    /// 由落盘内容还原，`created_at` 取自存储键
    pub fn from_stored(created_at: i64, raw: Value) -> Option<Self> {
        let id = match raw.get("id_str") {
            Some(Value::String(s)) => s.clone(),
            _ => raw.get("id")?.as_u64()?.to_string(),
        };
        let text = raw
            .get("text")
            .or_else(|| raw.get("full_text"))?
            .as_str()?
            .to_string();
        Some(Self {
            id,
            created_at,
            text,
            raw,
        })
    }

    /// 存储键（文件名）
    pub fn key(&self) -> String {
        format!("{}.json", self.created_at)
    }
}
