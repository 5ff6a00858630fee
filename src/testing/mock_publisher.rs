//! Mock 发布客户端，记录上传与提交而不访问网络。

use crate::error::{BotError, Result};
use crate::twitter::{MediaRef, Publisher};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// 一次被记录的回复提交
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedReply {
    pub status: String,
    pub in_reply_to_id: String,
    pub media_ids: Vec<String>,
}

/// 可脚本化的 Mock Publisher。
///
/// 上传依次返回 `media-1`、`media-2`……；可预设上传或提交失败。
pub struct MockPublisher {
    uploads: Arc<Mutex<Vec<PathBuf>>>,
    submits: Arc<Mutex<Vec<SubmittedReply>>>,
    upload_failure: Option<String>,
    submit_failure: Option<String>,
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            submits: Arc::new(Mutex::new(Vec::new())),
            upload_failure: None,
            submit_failure: None,
        }
    }

    /// 所有上传调用都失败
    pub fn with_upload_failure(mut self, msg: impl Into<String>) -> Self {
        self.upload_failure = Some(msg.into());
        self
    }

    /// 提交调用失败
    pub fn with_submit_failure(mut self, msg: impl Into<String>) -> Self {
        self.submit_failure = Some(msg.into());
        self
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn submits(&self) -> Vec<SubmittedReply> {
        self.submits.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn submit_count(&self) -> usize {
        self.submits.lock().unwrap().len()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn upload_media(&self, path: &Path) -> Result<MediaRef> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(path.to_path_buf());
        if let Some(msg) = &self.upload_failure {
            return Err(BotError::Other(msg.clone()));
        }
        Ok(MediaRef(format!("media-{}", uploads.len())))
    }

    async fn submit_reply(
        &self,
        status: &str,
        in_reply_to_id: &str,
        media: &[MediaRef],
    ) -> Result<()> {
        self.submits.lock().unwrap().push(SubmittedReply {
            status: status.to_string(),
            in_reply_to_id: in_reply_to_id.to_string(),
            media_ids: media.iter().map(|m| m.as_str().to_string()).collect(),
        });
        match &self.submit_failure {
            Some(msg) => Err(BotError::Other(msg.clone())),
            None => Ok(()),
        }
    }
}
