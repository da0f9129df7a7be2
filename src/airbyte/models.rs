// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use validator::Validate;

/// 流的同步方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    FullRefresh,
    Incremental,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::FullRefresh => "full_refresh",
            SyncMode::Incremental => "incremental",
        }
    }
}

/// 目标端写入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationSyncMode {
    Append,
    Overwrite,
    AppendDedup,
    OverwriteDedup,
}

impl DestinationSyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationSyncMode::Append => "append",
            DestinationSyncMode::Overwrite => "overwrite",
            DestinationSyncMode::AppendDedup => "append_dedup",
            DestinationSyncMode::OverwriteDedup => "overwrite_dedup",
        }
    }
}

/// 调用方对单个流的选择
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StreamSelection {
    /// 与发现目录中的流名称对应
    #[validate(length(min = 1, message = "stream name must not be empty"))]
    pub name: String,
    pub selected: bool,
    pub sync_mode: SyncMode,
    pub destination_sync_mode: DestinationSyncMode,
}

/// 发现目录中的流描述
///
/// 远端的同步方式按原样保留，新版本可能返回本地未定义的取值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStream {
    pub name: String,
    #[serde(default)]
    pub supported_sync_modes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 发现目录中的流配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_sync_mode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 目录条目（流 + 配置）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub stream: CatalogStream,
    #[serde(default)]
    pub config: StreamConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncCatalog {
    pub streams: Vec<CatalogEntry>,
}

/// `sources/discover_schema` 的成功响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredCatalog {
    pub catalog: SyncCatalog,
    pub catalog_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReason {
    pub external_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    #[serde(default)]
    pub succeeded: Option<bool>,
    #[serde(default)]
    pub failure_reason: Option<FailureReason>,
}

/// 远端作业失败形状
///
/// 成功的发现响应同样带 `jobInfo`，只有 `succeeded == false` 或带
/// `failureReason` 时才算失败
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFailure {
    pub job_info: JobInfo,
}

impl JobFailure {
    pub fn is_failure(&self) -> bool {
        self.job_info.succeeded == Some(false) || self.job_info.failure_reason.is_some()
    }
}

/// 远端通用错误形状
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// schema 发现响应
///
/// 依次尝试：目录、作业失败、通用错误，最后兜底
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DiscoverResponse {
    Catalog(DiscoveredCatalog),
    JobFailure(JobFailure),
    Error(ErrorBody),
    Other(Value),
}

/// 远端作业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Incomplete,
    Failed,
    Succeeded,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Succeeded | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Incomplete => "incomplete",
            JobStatus::Failed => "failed",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i64,
    pub status: JobStatus,
}

/// `connections/sync` 与 `jobs/get` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResponse {
    pub job: JobSummary,
}

/// 创建或更新连接的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "sourceId must not be empty"))]
    pub source_id: String,
    #[validate(length(min = 1, message = "destinationId must not be empty"))]
    pub destination_id: String,
    #[validate(nested)]
    pub streams: Vec<StreamSelection>,
    #[serde(default)]
    pub normalize: bool,
    /// 覆盖目标端 schema，设置后使用自定义命名空间
    #[serde(default)]
    pub destination_schema: Option<String>,
}

/// 命名空间定义方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceDefinition {
    Destination,
    Customformat,
}

/// 发送给 `connections/create` 或 `connections/update` 的完整请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    pub source_id: String,
    pub destination_id: String,
    pub source_catalog_id: String,
    pub sync_catalog: SyncCatalog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub prefix: String,
    pub namespace_definition: NamespaceDefinition,
    pub namespace_format: String,
    pub non_breaking_changes_preference: String,
    pub schedule_type: String,
    pub geography: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Value>>,
}
