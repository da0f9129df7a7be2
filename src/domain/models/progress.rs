// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 进度事件状态
///
/// 表示某次运行在写入该事件时的状态。
/// `Completed` 与 `Failed` 为终止状态，之后不再接受新事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// 运行中
    Running,
    /// 已完成
    Completed,
    /// 已失败
    Failed,
}

impl RunStatus {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 运行整体状态
///
/// Pending → Running → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// 已登记，尚未写入任何事件
    Pending,
    Running,
    Completed,
    Failed,
}

impl From<RunStatus> for RunState {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Running => RunState::Running,
            RunStatus::Completed => RunState::Completed,
            RunStatus::Failed => RunState::Failed,
        }
    }
}

/// 进度事件
///
/// 一次运行中的一条增量状态记录，按追加顺序回放
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 可读消息
    pub message: String,
    /// 写入该事件时运行的状态
    pub status: RunStatus,
    /// 错误详情
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 捕获的进程输出（按行）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<String>>,
}

impl ProgressEvent {
    pub fn running(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: RunStatus::Running,
            error: None,
            output: None,
        }
    }

    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: RunStatus::Completed,
            error: None,
            output: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: RunStatus::Failed,
            error: None,
            output: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_output(mut self, output: Vec<String>) -> Self {
        self.output = Some(output);
        self
    }
}

/// 运行记录
///
/// 进度通道中一个运行ID对应的完整存储内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub events: Vec<ProgressEvent>,
}

impl RunRecord {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            events: Vec::new(),
        }
    }

    /// 根据最后一条事件推导运行状态
    pub fn state(&self) -> RunState {
        self.events
            .last()
            .map(|event| event.status.into())
            .unwrap_or(RunState::Pending)
    }

    /// 是否已进入终止状态
    pub fn is_terminal(&self) -> bool {
        self.events
            .last()
            .is_some_and(|event| event.status.is_terminal())
    }
}
