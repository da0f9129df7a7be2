// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{fail, RunOutcome, TaskOrchestrator};
use crate::domain::models::progress::ProgressEvent;
use crate::domain::repositories::secret_store::git_token_secret_name;
use crate::domain::services::progress_channel::{ProgressError, RunProgress};
use crate::executors::CommandSpec;
use crate::utils::url_utils::{embed_access_token, redact_credentials, scrub_secret};
use std::path::Path;
use tracing::{info, warn};

/// 克隆目标子目录名
pub(super) const REPO_DIR: &str = "dbtrepo";

impl TaskOrchestrator {
    /// 将仓库克隆到 `{project_dir}/dbtrepo`
    ///
    /// 已存在的 dbtrepo 会先被整体删除。`child` 为真时成功事件保持 running，
    /// 由外层步骤继续推进。
    pub(super) async fn clone_repo(
        &self,
        run: &RunProgress,
        repo_url: &str,
        access_token: Option<&str>,
        project_dir: &Path,
        child: bool,
    ) -> Result<RunOutcome, ProgressError> {
        let clone_url = match access_token {
            Some(token) => match embed_access_token(repo_url, token) {
                Ok(url) => url,
                Err(e) => {
                    return fail(run, "invalid git repo url", Some(e.to_string())).await;
                }
            },
            None => repo_url.to_string(),
        };

        if !project_dir.exists() {
            if let Err(e) = tokio::fs::create_dir_all(project_dir).await {
                return fail(run, "could not create project_dir", Some(e.to_string())).await;
            }
            run.emit(ProgressEvent::running(format!(
                "created project_dir {}",
                project_dir.display()
            )))
            .await?;
        } else {
            let repo_dir = project_dir.join(REPO_DIR);
            if repo_dir.exists() {
                if let Err(e) = tokio::fs::remove_dir_all(&repo_dir).await {
                    return fail(run, "could not remove old dbtrepo", Some(e.to_string())).await;
                }
            }
        }

        info!(
            "Cloning {} into {}",
            redact_credentials(repo_url),
            project_dir.display()
        );
        let spec = CommandSpec::new("git", project_dir)
            .arg("clone")
            .arg(clone_url)
            .arg(REPO_DIR);
        if let Err(e) = self.runner.run(&spec).await {
            let detail = scrub_secret(&e.to_string(), access_token);
            warn!("git clone failed for run {}: {}", run.run_id(), detail);
            return fail(run, "git clone failed", Some(detail)).await;
        }

        let event = if child {
            ProgressEvent::running("cloned git repo")
        } else {
            ProgressEvent::completed("cloned git repo")
        };
        run.emit(event).await?;
        Ok(RunOutcome::Succeeded)
    }

    /// 按已登记的工作区重新克隆
    pub(super) async fn reclone_workspace(
        &self,
        run: &RunProgress,
        org_id: i32,
    ) -> Result<RunOutcome, ProgressError> {
        run.emit(ProgressEvent::running("started")).await?;

        let orgdbt = match self.orgs.find_dbt(org_id).await {
            Ok(Some(orgdbt)) => orgdbt,
            Ok(None) => return fail(run, "need to set up a dbt workspace first", None).await,
            Err(e) => return fail(run, "could not read dbt workspace", Some(e.to_string())).await,
        };

        let token = match self
            .secrets
            .get(org_id, &git_token_secret_name(org_id))
            .await
        {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => return fail(run, "could not read git access token", Some(e.to_string())).await,
        };

        self.clone_repo(
            run,
            &orgdbt.gitrepo_url,
            token.as_deref(),
            Path::new(&orgdbt.project_dir),
            false,
        )
        .await
    }
}

#[cfg(test)]
#[path = "repo_acquisition_test.rs"]
mod tests;
