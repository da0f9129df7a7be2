// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::progress::{ProgressEvent, RunRecord, RunState};
use crate::domain::repositories::kv_store::{KeyValueStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const KEY_PREFIX: &str = "taskprogress:";

/// 进度通道错误类型
#[derive(Error, Debug)]
pub enum ProgressError {
    /// 运行不存在或已过期
    #[error("Run not found: {0}")]
    NotFound(String),
    /// 运行ID已被使用
    #[error("Run already started: {0}")]
    AlreadyStarted(String),
    /// 存储错误
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 进度通道
///
/// 以运行ID为键的只追加事件日志，存放在共享键值存储中。
/// 每次写入都会刷新保留时间，长时间无写入的运行自动过期。
#[derive(Clone)]
pub struct ProgressChannel {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl ProgressChannel {
    /// 创建新的进度通道
    ///
    /// # 参数
    ///
    /// * `store` - 共享键值存储
    /// * `ttl` - 运行记录的保留时间
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    fn key(run_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, run_id)
    }

    async fn load(&self, run_id: &str) -> Result<RunRecord, ProgressError> {
        let raw = self
            .store
            .get(&Self::key(run_id))
            .await?
            .ok_or_else(|| ProgressError::NotFound(run_id.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::from(e).into())
    }

    /// 登记一次新运行，状态为 pending
    pub async fn start_run(&self, run_id: &str) -> Result<(), ProgressError> {
        let record = RunRecord::new(run_id);
        let raw = serde_json::to_string(&record).map_err(StoreError::from)?;
        let created = self
            .store
            .set_if_absent(&Self::key(run_id), &raw, Some(self.ttl))
            .await?;
        if !created {
            return Err(ProgressError::AlreadyStarted(run_id.to_string()));
        }
        debug!("Started run {}", run_id);
        Ok(())
    }

    /// 追加事件
    ///
    /// 运行已处于终止状态时记录警告并忽略该事件
    pub async fn append(&self, run_id: &str, event: ProgressEvent) -> Result<(), ProgressError> {
        let mut record = self.load(run_id).await?;
        if record.is_terminal() {
            warn!(
                "Ignoring event '{}' for run {}: run already finished",
                event.message, run_id
            );
            return Ok(());
        }

        debug!("Run {}: {} ({})", run_id, event.message, event.status);
        record.events.push(event);
        let raw = serde_json::to_string(&record).map_err(StoreError::from)?;
        self.store
            .set(&Self::key(run_id), &raw, Some(self.ttl))
            .await?;
        Ok(())
    }

    /// 按追加顺序读取全部事件
    pub async fn read(&self, run_id: &str) -> Result<Vec<ProgressEvent>, ProgressError> {
        Ok(self.load(run_id).await?.events)
    }

    /// 读取完整运行记录
    pub async fn record(&self, run_id: &str) -> Result<RunRecord, ProgressError> {
        self.load(run_id).await
    }

    pub async fn status(&self, run_id: &str) -> Result<RunState, ProgressError> {
        Ok(self.load(run_id).await?.state())
    }

    /// 绑定运行ID的句柄
    pub fn run(&self, run_id: impl Into<String>) -> RunProgress {
        RunProgress {
            channel: self.clone(),
            run_id: run_id.into(),
        }
    }
}

/// 单次运行的进度句柄
///
/// 编排步骤通过它写事件，不需要传递运行ID
#[derive(Clone)]
pub struct RunProgress {
    channel: ProgressChannel,
    run_id: String,
}

impl RunProgress {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub async fn emit(&self, event: ProgressEvent) -> Result<(), ProgressError> {
        self.channel.append(&self.run_id, event).await
    }
}

#[cfg(test)]
#[path = "progress_channel_test.rs"]
mod tests;
