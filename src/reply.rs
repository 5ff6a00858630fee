//! 回复的组装与发布
//!
//! 发布顺序固定：按顺序逐个上传媒体，全部成功后再提交回复。
//! 任一步失败即返回 [`PublishError`]，不重试。

use crate::error::{BotError, PublishError, Result};
use crate::twitter::Publisher;
use std::path::PathBuf;
use tracing::info;

/// 追加在每条回复末尾的固定标签
pub const REPLY_SUFFIX: &str =
    "@MaayanLab #Enrichr #Bioinformatics #BD2K #LINCS @BD2KLINCSDCIC @DruggableGenome #BigData";

/// 一次待发布的回复，只在单次运行内存在
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRequest {
    pub target_user_handle: String,
    pub message_text: String,
    pub media_paths: Vec<PathBuf>,
    pub in_reply_to_id: String,
}

impl ReplyRequest {
    /// 实际提交的状态文本：`@<handle> <message>`
    pub fn status_text(&self) -> String {
        format!("@{} {}", self.target_user_handle, self.message_text)
    }

    /// dry-run 模式下展示的调用
    pub fn render_call(&self) -> String {
        let media = self
            .media_paths
            .iter()
            .map(|p| format!("{:?}", p.display().to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "reply_to({:?}, {:?}, [{}], {:?})",
            self.target_user_handle, self.message_text, media, self.in_reply_to_id
        )
    }
}

/// 由标识符和链接生成回复正文（纯函数）
pub fn compose(identifier: &str, link: &str) -> String {
    format!(
        "{}. Enrichr link: {} {}",
        capitalize(&identifier.replace('_', " ")),
        link,
        REPLY_SUFFIX
    )
}

/// 首字母大写，其余小写
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

/// 上传全部媒体后提交回复
pub async fn publish(publisher: &dyn Publisher, request: &ReplyRequest) -> Result<()> {
    let status = request.status_text();
    info!(
        in_reply_to = %request.in_reply_to_id,
        media = request.media_paths.len(),
        "📤 发布回复: {}", status
    );

    let mut media = Vec::with_capacity(request.media_paths.len());
    for path in &request.media_paths {
        let uploaded = publisher.upload_media(path).await.map_err(|e| {
            into_publish_error(e, |message| PublishError::UploadFailed {
                path: path.display().to_string(),
                message,
            })
        })?;
        media.push(uploaded);
    }

    publisher
        .submit_reply(&status, &request.in_reply_to_id, &media)
        .await
        .map_err(|e| {
            into_publish_error(e, |message| PublishError::SubmitFailed {
                in_reply_to: request.in_reply_to_id.clone(),
                message,
            })
        })?;

    info!(in_reply_to = %request.in_reply_to_id, "✅ 回复已发布");
    Ok(())
}

/// 发布阶段的任何失败都归为 `PublishError`
fn into_publish_error(err: BotError, wrap: impl FnOnce(String) -> PublishError) -> BotError {
    match err {
        BotError::Publish(e) => BotError::Publish(e),
        other => BotError::Publish(wrap(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPublisher;

    fn request() -> ReplyRequest {
        ReplyRequest {
            target_user_handle: "SbotGwa".to_string(),
            message_text: compose("tp53_pathway", "http://link"),
            media_paths: vec![PathBuf::from("img/a.png"), PathBuf::from("img/b.png")],
            in_reply_to_id: "101".to_string(),
        }
    }

    #[test]
    fn test_compose() {
        assert_eq!(
            compose("brca1_variant", "http://x/y"),
            "Brca1 variant. Enrichr link: http://x/y @MaayanLab #Enrichr #Bioinformatics \
             #BD2K #LINCS @BD2KLINCSDCIC @DruggableGenome #BigData"
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        assert_eq!(
            compose("brca1_variant", "http://x/y"),
            compose("brca1_variant", "http://x/y")
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("tp53 PATHWAY"), "Tp53 pathway");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_render_call() {
        let rendered = request().render_call();
        assert!(rendered.starts_with("reply_to(\"SbotGwa\", \"Tp53 pathway. Enrichr link: http://link"));
        assert!(rendered.ends_with("[\"img/a.png\", \"img/b.png\"], \"101\")"));
    }

    #[tokio::test]
    async fn test_publish_uploads_in_order_then_submits() -> Result<()> {
        let publisher = MockPublisher::new();
        publish(&publisher, &request()).await?;

        assert_eq!(
            publisher.uploads(),
            vec![PathBuf::from("img/a.png"), PathBuf::from("img/b.png")]
        );
        let submits = publisher.submits();
        assert_eq!(submits.len(), 1);
        assert!(submits[0].status.starts_with("@SbotGwa Tp53 pathway."));
        assert_eq!(submits[0].in_reply_to_id, "101");
        assert_eq!(submits[0].media_ids, vec!["media-1", "media-2"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_failure_stops_before_submit() {
        let publisher = MockPublisher::new().with_upload_failure("disk unreadable");
        match publish(&publisher, &request()).await {
            Err(BotError::Publish(PublishError::UploadFailed { path, .. })) => {
                assert_eq!(path, "img/a.png")
            }
            other => panic!("应该是 UploadFailed: {:?}", other),
        }
        assert_eq!(publisher.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_failure_is_publish_error() {
        let publisher = MockPublisher::new().with_submit_failure("rate limited");
        assert!(matches!(
            publish(&publisher, &request()).await,
            Err(BotError::Publish(PublishError::SubmitFailed { .. }))
        ));
        assert_eq!(publisher.upload_count(), 2);
    }
}
