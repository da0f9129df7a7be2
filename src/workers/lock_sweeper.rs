// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::lock::LockNamespace;
use crate::domain::services::lock_registry::LockRegistry;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 过期锁清理工作器
///
/// 每个命名空间一个实例，按固定间隔删除持有时间超过阈值的锁
pub struct LockSweeper {
    registry: LockRegistry,
    namespace: LockNamespace,
    name: String,
    interval: Duration,
    threshold: Duration,
}

impl LockSweeper {
    pub fn new(
        registry: LockRegistry,
        namespace: LockNamespace,
        interval: Duration,
        threshold: Duration,
    ) -> Self {
        Self {
            registry,
            namespace,
            name: format!("{}-lock-sweeper", namespace),
            interval,
            threshold,
        }
    }

    /// 执行一次清理，返回删除的锁数量
    pub async fn sweep_once(&self) -> Result<u64, WorkerError> {
        self.registry
            .sweep_namespace(self.namespace, self.threshold)
            .await
            .map_err(|e| WorkerError::StoreError(e.to_string()))
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                error!("{} stopped: {}", self.name, e);
            }
        })
    }
}

#[async_trait]
impl Worker for LockSweeper {
    async fn run(&self) -> Result<(), WorkerError> {
        info!(
            "{} started (every {:?}, threshold {:?})",
            self.name, self.interval, self.threshold
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;

            match self.sweep_once().await {
                Ok(count) => {
                    if count > 0 {
                        info!("{} removed {} stale locks", self.name, count);
                    }
                }
                Err(e) => {
                    error!("{} failed: {}", self.name, e);
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "lock_sweeper_test.rs"]
mod tests;
