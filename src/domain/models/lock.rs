// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 锁命名空间
///
/// 块级锁与任务级锁分别存放，由两个独立的清理任务维护
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockNamespace {
    /// 块级锁，例如某个组织的某条 Airbyte 连接
    Block,
    /// 任务级锁，例如某个组织的 dbt 工作区目录
    Task,
}

impl LockNamespace {
    pub const ALL: [LockNamespace; 2] = [LockNamespace::Block, LockNamespace::Task];

    /// 存储键前缀
    pub fn key_prefix(&self) -> String {
        format!("lock:{}:", self)
    }
}

impl fmt::Display for LockNamespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LockNamespace::Block => write!(f, "block"),
            LockNamespace::Task => write!(f, "task"),
        }
    }
}

/// 被独占的资源标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub namespace: LockNamespace,
    pub name: String,
}

impl ResourceKey {
    pub fn new(namespace: LockNamespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    /// 组织的 dbt 工作区目录（克隆、工作区搭建、dbt 命令共用）
    pub fn dbt_workspace(org_id: i32) -> Self {
        Self::new(LockNamespace::Task, format!("org-{}:dbt-workspace", org_id))
    }

    /// 组织的某条 Airbyte 连接
    pub fn connection(org_id: i32, connection_id: &str) -> Self {
        Self::new(
            LockNamespace::Block,
            format!("org-{}:connection-{}", org_id, connection_id),
        )
    }

    /// 在键值存储中的完整键
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.namespace.key_prefix(), self.name)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// 锁记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lock {
    pub resource_key: ResourceKey,
    /// 持有者（通常是运行ID）
    pub holder: String,
    pub locked_at: DateTime<Utc>,
}

impl Lock {
    pub fn new(resource_key: ResourceKey, holder: impl Into<String>) -> Self {
        Self {
            resource_key,
            holder: holder.into(),
            locked_at: Utc::now(),
        }
    }

    /// 相对 `now` 是否已超过 `threshold`
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        match chrono::Duration::from_std(threshold) {
            Ok(threshold) => self.locked_at < now - threshold,
            Err(_) => false,
        }
    }
}
