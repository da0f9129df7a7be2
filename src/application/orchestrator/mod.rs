// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 后台任务编排器
//!
//! 每次调度生成一个运行ID，同步获取资源锁并登记运行，
//! 然后在独立的 tokio 任务中顺序执行各步骤，结束时释放锁。
//! 步骤失败只通过进度通道呈现，不会向调用方抛出。

mod command_pipeline;
mod connection_sync;
mod repo_acquisition;
mod workspace_setup;

#[cfg(test)]
mod test_support;

use crate::airbyte::AirbyteService;
use crate::application::dto::dbt_workspace_request::WorkspaceSetupRequest;
use crate::config::settings::Settings;
use crate::domain::models::lock::ResourceKey;
use crate::domain::models::progress::ProgressEvent;
use crate::domain::repositories::org_repository::OrgRepository;
use crate::domain::repositories::profile_block_source::ProfileBlockSource;
use crate::domain::repositories::secret_store::SecretStore;
use crate::domain::services::lock_registry::{LockError, LockRegistry};
use crate::domain::services::progress_channel::{ProgressChannel, ProgressError, RunProgress};
use crate::executors::CommandRunner;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 编排器错误类型
///
/// 只在调度阶段返回；运行中的失败写入进度通道
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// 资源正被其他运行占用
    #[error("{resource} is locked by run {holder}")]
    Locked { resource: String, holder: String },
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Lock(LockError),
}

impl From<LockError> for OrchestratorError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Conflict { resource, holder } => {
                OrchestratorError::Locked { resource, holder }
            }
            other => OrchestratorError::Lock(other),
        }
    }
}

/// 一次运行的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed,
}

/// 编排器配置
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// 各组织 dbt 项目的根目录
    pub clientdbt_root: PathBuf,
    /// dbt 虚拟环境目录
    pub dbt_venv: PathBuf,
    pub sync_poll_interval: Duration,
    pub sync_max_wait: Duration,
}

impl From<&Settings> for OrchestratorConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            clientdbt_root: settings.dbt.clientdbt_root.clone(),
            dbt_venv: settings.dbt.dbt_venv.clone(),
            sync_poll_interval: Duration::from_secs(settings.sync.poll_interval_seconds),
            sync_max_wait: Duration::from_secs(settings.sync.max_wait_seconds),
        }
    }
}

/// 已调度的运行
pub struct DispatchedRun {
    pub run_id: String,
    /// 运行结束（含释放锁）后完成
    pub handle: JoinHandle<()>,
}

/// 任务编排器
#[derive(Clone)]
pub struct TaskOrchestrator {
    progress: ProgressChannel,
    locks: LockRegistry,
    orgs: Arc<dyn OrgRepository>,
    secrets: Arc<dyn SecretStore>,
    profiles: Arc<dyn ProfileBlockSource>,
    runner: Arc<dyn CommandRunner>,
    airbyte: AirbyteService,
    config: Arc<OrchestratorConfig>,
}

impl TaskOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        progress: ProgressChannel,
        locks: LockRegistry,
        orgs: Arc<dyn OrgRepository>,
        secrets: Arc<dyn SecretStore>,
        profiles: Arc<dyn ProfileBlockSource>,
        runner: Arc<dyn CommandRunner>,
        airbyte: AirbyteService,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            progress,
            locks,
            orgs,
            secrets,
            profiles,
            runner,
            airbyte,
            config: Arc::new(config),
        }
    }

    pub fn progress(&self) -> &ProgressChannel {
        &self.progress
    }

    /// 重新克隆组织已登记的 dbt 仓库
    pub async fn dispatch_clone_repo(&self, org_id: i32) -> Result<DispatchedRun, OrchestratorError> {
        self.dispatch("clone_repo", ResourceKey::dbt_workspace(org_id), move |this, run| async move {
            this.reclone_workspace(&run, org_id).await
        })
        .await
    }

    /// 搭建（或重建）组织的 dbt 工作区
    pub async fn dispatch_workspace_setup(
        &self,
        org_id: i32,
        request: WorkspaceSetupRequest,
    ) -> Result<DispatchedRun, OrchestratorError> {
        self.dispatch(
            "workspace_setup",
            ResourceKey::dbt_workspace(org_id),
            move |this, run| async move { this.setup_workspace(&run, org_id, &request).await },
        )
        .await
    }

    /// 依次执行 dbt clean、deps、run
    pub async fn dispatch_dbt_commands(&self, org_id: i32) -> Result<DispatchedRun, OrchestratorError> {
        self.dispatch("dbt_commands", ResourceKey::dbt_workspace(org_id), move |this, run| async move {
            this.run_dbt_commands(&run, org_id).await
        })
        .await
    }

    /// 触发 Airbyte 连接同步并等待作业结束
    pub async fn dispatch_connection_sync(
        &self,
        org_id: i32,
        workspace_id: String,
        connection_id: String,
    ) -> Result<DispatchedRun, OrchestratorError> {
        let key = ResourceKey::connection(org_id, &connection_id);
        self.dispatch("connection_sync", key, move |this, run| async move {
            this.sync_connection(&run, &workspace_id, &connection_id).await
        })
        .await
    }

    async fn dispatch<F, Fut>(
        &self,
        kind: &'static str,
        key: ResourceKey,
        body: F,
    ) -> Result<DispatchedRun, OrchestratorError>
    where
        F: FnOnce(TaskOrchestrator, RunProgress) -> Fut + Send + 'static,
        Fut: Future<Output = Result<RunOutcome, ProgressError>> + Send + 'static,
    {
        let run_id = Uuid::new_v4().to_string();
        self.locks.acquire(&key, &run_id).await?;

        if let Err(e) = self.progress.start_run(&run_id).await {
            if let Err(release_err) = self.locks.release(&key).await {
                warn!("Failed to release lock {}: {}", key, release_err);
            }
            return Err(e.into());
        }

        info!("Dispatched {} run {} holding {}", kind, run_id, key);
        metrics::counter!("orchestrator_runs_total", "kind" => kind).increment(1);

        let this = self.clone();
        let run = self.progress.run(run_id.clone());
        let handle = tokio::spawn(async move {
            let inner = tokio::spawn(body(this.clone(), run.clone()));
            let outcome = match inner.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    error!("Run {} could not record progress: {}", run.run_id(), e);
                    RunOutcome::Failed
                }
                Err(e) => {
                    error!("Run {} aborted: {}", run.run_id(), e);
                    let event = ProgressEvent::failed("internal error").with_error(e.to_string());
                    if let Err(e) = run.emit(event).await {
                        error!("Run {} could not record failure: {}", run.run_id(), e);
                    }
                    RunOutcome::Failed
                }
            };

            if outcome == RunOutcome::Failed {
                metrics::counter!("orchestrator_run_failures_total", "kind" => kind).increment(1);
            }
            info!("Run {} ({}) finished: {:?}", run.run_id(), kind, outcome);

            if let Err(e) = this.locks.release(&key).await {
                warn!("Failed to release lock {}: {}", key, e);
            }
        });

        Ok(DispatchedRun { run_id, handle })
    }
}

/// 写入失败事件并返回失败结果
async fn fail(
    run: &RunProgress,
    message: &str,
    error: Option<String>,
) -> Result<RunOutcome, ProgressError> {
    let mut event = ProgressEvent::failed(message);
    if let Some(error) = error {
        event = event.with_error(error);
    }
    run.emit(event).await?;
    Ok(RunOutcome::Failed)
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
