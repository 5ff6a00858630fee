//! 单次运行的完整流程
//!
//! ```text
//! Collecting -> Resolving -> Composing -> Publishing -> Done
//!                   \                         \
//!                    `-------> Failed <--------'
//! ```
//!
//! 没有可恢复的中间状态：失败的运行需要由外部调度从头重新触发。

use crate::checkpoint::CheckpointStore;
use crate::collector::TimelineCollector;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::extractor::extract;
use crate::lookup::{Dataset, resolve};
use crate::reply::{ReplyRequest, compose, publish};
use crate::twitter::{FeedClient, Publisher};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Collecting,
    Resolving,
    Composing,
    Publishing,
    Done,
    Failed,
}

/// 执行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Publish,
    /// 只打印将要发起的调用，不产生网络副作用
    DryRun,
}

/// 一次成功运行的结果
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub identifier: String,
    pub request: ReplyRequest,
    pub published: bool,
}

pub struct Bot {
    config: Config,
    collector: TimelineCollector,
    store: Arc<dyn CheckpointStore>,
    publisher: Arc<dyn Publisher>,
    stage: RunStage,
}

impl Bot {
    pub fn new(
        config: Config,
        feed: Arc<dyn FeedClient>,
        publisher: Arc<dyn Publisher>,
        store: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            collector: TimelineCollector::new(feed, store.clone()),
            config,
            store,
            publisher,
            stage: RunStage::Idle,
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    fn enter(&mut self, stage: RunStage) {
        info!(from = ?self.stage, to = ?stage, "阶段切换");
        self.stage = stage;
    }

    pub async fn run(&mut self, mode: RunMode) -> Result<RunOutcome> {
        match self.run_stages(mode).await {
            Ok(outcome) => {
                self.enter(RunStage::Done);
                Ok(outcome)
            }
            Err(e) => {
                error!(stage = ?self.stage, error = %e, "❌ 运行失败");
                self.stage = RunStage::Failed;
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self, mode: RunMode) -> Result<RunOutcome> {
        self.enter(RunStage::Collecting);
        let handle = self.config.target_handle.clone();
        self.collector.collect(&handle).await?;

        self.enter(RunStage::Resolving);
        let latest = self.store.latest().await?.ok_or(BotError::NoCheckpoint)?;
        let identifier = extract(&latest);
        info!(post_id = %latest.id, identifier = %identifier, "🔍 查找标识符");
        let dataset = Dataset::load(&self.config.lookup_results, &self.config.enrichr_url)?;
        let entry = resolve(&identifier, dataset.entries())?;

        self.enter(RunStage::Composing);
        let request = ReplyRequest {
            target_user_handle: handle,
            message_text: compose(&identifier, &dataset.link(entry)),
            media_paths: vec![dataset.screenshot_path(entry)],
            in_reply_to_id: latest.id.clone(),
        };

        let published = match mode {
            RunMode::DryRun => {
                println!("{}", request.render_call());
                info!(post_id = %latest.id, "dry-run：跳过发布");
                false
            }
            RunMode::Publish => {
                self.enter(RunStage::Publishing);
                publish(self.publisher.as_ref(), &request).await?;
                true
            }
        };

        Ok(RunOutcome {
            identifier,
            request,
            published,
        })
    }
}
