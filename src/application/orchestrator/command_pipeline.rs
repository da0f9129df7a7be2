// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::repo_acquisition::REPO_DIR;
use super::{fail, RunOutcome, TaskOrchestrator};
use crate::domain::models::org::DBT_CLI_PROFILE;
use crate::domain::models::progress::ProgressEvent;
use crate::domain::services::progress_channel::{ProgressError, RunProgress};
use crate::executors::CommandSpec;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 依次执行的 dbt 子命令
pub(super) const DBT_STEPS: [&str; 3] = ["clean", "deps", "run"];

/// 相对仓库目录，指向重新生成的 profiles.yml
pub(super) const PROFILES_DIR_ARG: &str = "--profiles-dir=profiles";

impl TaskOrchestrator {
    /// 重新生成 profiles.yml 后依次执行 dbt clean、deps、run
    ///
    /// 任何一步失败都会终止后续步骤，已完成步骤的输出保留在事件历史中
    pub(super) async fn run_dbt_commands(
        &self,
        run: &RunProgress,
        org_id: i32,
    ) -> Result<RunOutcome, ProgressError> {
        run.emit(ProgressEvent::running("started")).await?;

        match self.orgs.find_org(org_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return fail(run, "org not found", None).await,
            Err(e) => return fail(run, "could not read org", Some(e.to_string())).await,
        }

        let orgdbt = match self.orgs.find_dbt(org_id).await {
            Ok(Some(orgdbt)) => orgdbt,
            Ok(None) => return fail(run, "need to set up a dbt workspace first", None).await,
            Err(e) => return fail(run, "could not read dbt workspace", Some(e.to_string())).await,
        };

        let block = match self.orgs.find_block(org_id, DBT_CLI_PROFILE).await {
            Ok(Some(block)) => block,
            Ok(None) => return fail(run, "need to set up a dbt cli profile first", None).await,
            Err(e) => return fail(run, "could not read dbt cli profile", Some(e.to_string())).await,
        };

        let profile = match self.profiles.fetch_profile(&block.block_name).await {
            Ok(profile) => profile,
            Err(e) => return fail(run, "could not fetch dbt cli profile", Some(e.to_string())).await,
        };

        let repo_dir = Path::new(&orgdbt.project_dir).join(REPO_DIR);
        if let Err(e) = write_profiles_yml(&repo_dir, &profile).await {
            return fail(run, "could not write profiles.yml", Some(e)).await;
        }
        run.emit(ProgressEvent::running("wrote profiles.yml")).await?;

        let dbt_binary = Path::new(&orgdbt.dbt_venv).join("venv/bin/dbt");
        for step in DBT_STEPS {
            run.emit(ProgressEvent::running(format!("starting dbt {}", step)))
                .await?;
            let spec = CommandSpec::new(dbt_binary.to_string_lossy(), &repo_dir)
                .arg(step)
                .arg(PROFILES_DIR_ARG);
            match self.runner.run(&spec).await {
                Ok(output) => {
                    run.emit(
                        ProgressEvent::running(format!("dbt {} output", step))
                            .with_output(output.lines()),
                    )
                    .await?;
                }
                Err(e) => {
                    warn!("dbt {} failed for run {}: {}", step, run.run_id(), e);
                    run.emit(
                        ProgressEvent::failed(format!("dbt {} failed", step))
                            .with_error(e.to_string())
                            .with_output(e.stdout_lines()),
                    )
                    .await?;
                    return Ok(RunOutcome::Failed);
                }
            }
        }

        info!("dbt pipeline finished for org {}", org_id);
        run.emit(ProgressEvent::completed("dbt run completed"))
            .await?;
        Ok(RunOutcome::Succeeded)
    }
}

/// 写入 `{repo_dir}/profiles/profiles.yml`
async fn write_profiles_yml(repo_dir: &Path, profile: &Value) -> Result<PathBuf, String> {
    let dir = repo_dir.join("profiles");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;
    let yaml = serde_yaml::to_string(profile).map_err(|e| e.to_string())?;
    let path = dir.join("profiles.yml");
    tokio::fs::write(&path, yaml)
        .await
        .map_err(|e| e.to_string())?;
    Ok(path)
}

#[cfg(test)]
#[path = "command_pipeline_test.rs"]
mod tests;
