// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::progress::{ProgressEvent, RunRecord, RunState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 调度成功的响应
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAcceptedDto {
    /// 运行ID，用于轮询进度
    pub task_id: String,
}

/// 运行进度查询响应
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgressDto {
    pub task_id: String,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    /// 按写入顺序排列的事件
    pub progress: Vec<ProgressEvent>,
}

impl From<RunRecord> for TaskProgressDto {
    fn from(record: RunRecord) -> Self {
        Self {
            state: record.state(),
            task_id: record.run_id,
            started_at: record.started_at,
            progress: record.events,
        }
    }
}
