// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{fail, RunOutcome, TaskOrchestrator};
use crate::application::dto::dbt_workspace_request::WorkspaceSetupRequest;
use crate::domain::models::org::{NewOrgDbt, Org};
use crate::domain::models::progress::ProgressEvent;
use crate::domain::repositories::org_repository::RepositoryError;
use crate::domain::repositories::secret_store::git_token_secret_name;
use crate::domain::services::progress_channel::{ProgressError, RunProgress};
use crate::utils::slug::slugify;
use tracing::info;

const TRANSFORM_TYPE_GITHUB: &str = "github";

impl TaskOrchestrator {
    /// 搭建 dbt 工作区：检查仓库前置条件、克隆、登记工作区并保存令牌
    pub(super) async fn setup_workspace(
        &self,
        run: &RunProgress,
        org_id: i32,
        request: &WorkspaceSetupRequest,
    ) -> Result<RunOutcome, ProgressError> {
        run.emit(ProgressEvent::running("started")).await?;

        let org = match self.orgs.find_org(org_id).await {
            Ok(Some(org)) => org,
            Ok(None) => return fail(run, "org not found", None).await,
            Err(e) => return fail(run, "could not read org", Some(e.to_string())).await,
        };

        let warehouse = match self.orgs.find_warehouse(org_id).await {
            Ok(Some(warehouse)) => warehouse,
            Ok(None) => return fail(run, "need to set up a warehouse first", None).await,
            Err(e) => return fail(run, "could not read warehouse", Some(e.to_string())).await,
        };

        let slug = match self.ensure_slug(&org).await {
            Ok(slug) => slug,
            Err(e) => return fail(run, "could not save org slug", Some(e.to_string())).await,
        };
        let project_dir = self.config.clientdbt_root.join(&slug);

        let token = request.access_token();
        let outcome = self
            .clone_repo(run, &request.gitrepo_url, token, &project_dir, true)
            .await?;
        if outcome == RunOutcome::Failed {
            return Ok(outcome);
        }

        let new_dbt = NewOrgDbt {
            gitrepo_url: request.gitrepo_url.clone(),
            project_dir: project_dir.to_string_lossy().into_owned(),
            dbt_venv: self.config.dbt_venv.to_string_lossy().into_owned(),
            target_type: warehouse.wtype.clone(),
            default_schema: request.profile.target_configs_schema.clone(),
            transform_type: TRANSFORM_TYPE_GITHUB.to_string(),
        };
        let orgdbt = match self.orgs.create_dbt_and_link(org_id, new_dbt).await {
            Ok(orgdbt) => orgdbt,
            Err(e) => return fail(run, "could not save dbt workspace", Some(e.to_string())).await,
        };
        info!("Linked dbt workspace {} to org {}", orgdbt.id, org_id);

        if let Some(token) = token {
            if let Err(e) = self.rotate_git_token(org_id, token).await {
                return fail(run, "could not save git access token", Some(e.to_string())).await;
            }
        }

        run.emit(ProgressEvent::completed("wrote OrgDbt entry"))
            .await?;
        Ok(RunOutcome::Succeeded)
    }

    /// 返回组织 slug，首次使用时生成并持久化
    ///
    /// 名称中没有可用字符时退回 `org-{id}`，保证每个组织独占一个目录
    async fn ensure_slug(&self, org: &Org) -> Result<String, RepositoryError> {
        if let Some(slug) = org.slug.as_ref().filter(|s| !s.is_empty()) {
            return Ok(slug.clone());
        }
        let mut slug = slugify(&org.name);
        if slug.is_empty() {
            slug = format!("org-{}", org.id);
        }
        self.orgs.save_slug(org.id, &slug).await?;
        Ok(slug)
    }

    async fn rotate_git_token(&self, org_id: i32, token: &str) -> Result<(), RepositoryError> {
        let name = git_token_secret_name(org_id);
        self.secrets.delete(org_id, &name).await?;
        self.secrets.save(org_id, &name, token).await
    }
}

#[cfg(test)]
#[path = "workspace_setup_test.rs"]
mod tests;
