// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::LockSettings;
use crate::domain::models::lock::LockNamespace;
use crate::domain::services::lock_registry::LockRegistry;
use crate::workers::lock_sweeper::LockSweeper;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
///
/// 负责后台维护任务的启动与关闭
pub struct WorkerManager {
    registry: LockRegistry,
    settings: LockSettings,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new(registry: LockRegistry, settings: LockSettings) -> Self {
        Self {
            registry,
            settings,
            handles: Vec::new(),
        }
    }

    /// 启动清理工作器
    ///
    /// 每个锁命名空间启动一个结构相同的清理任务
    pub fn start_sweepers(&mut self) {
        for namespace in LockNamespace::ALL {
            let sweeper = LockSweeper::new(
                self.registry.clone(),
                namespace,
                self.settings.sweep_interval(),
                self.settings.stale_after(),
            );
            self.handles.push(sweeper.start());
        }
        info!("Started {} lock sweepers", self.handles.len());
    }

    pub fn running(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// 等待关闭信号并关闭工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
        self.shutdown().await;
    }

    /// 终止所有工作器并等待其退出
    pub async fn shutdown(&mut self) {
        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }
        futures::future::join_all(self.handles.drain(..)).await;
        info!("Workers shut down successfully");
    }
}
