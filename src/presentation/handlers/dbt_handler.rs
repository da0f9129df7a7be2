// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::dbt_workspace_request::WorkspaceSetupRequest;
use crate::application::dto::task_response::TaskAcceptedDto;
use crate::application::orchestrator::TaskOrchestrator;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::org_id::OrgId;
use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use tracing::info;
use validator::Validate;

/// 搭建 dbt 工作区
pub async fn setup_workspace(
    OrgId(org_id): OrgId,
    Extension(orchestrator): Extension<TaskOrchestrator>,
    Json(payload): Json<WorkspaceSetupRequest>,
) -> Result<(StatusCode, Json<TaskAcceptedDto>), AppError> {
    payload.validate()?;
    let run = orchestrator
        .dispatch_workspace_setup(org_id, payload)
        .await?;
    info!("Org {} workspace setup dispatched as {}", org_id, run.run_id);
    Ok((
        StatusCode::ACCEPTED,
        Json(TaskAcceptedDto {
            task_id: run.run_id,
        }),
    ))
}

/// 执行 dbt clean、deps、run
pub async fn run_dbt(
    OrgId(org_id): OrgId,
    Extension(orchestrator): Extension<TaskOrchestrator>,
) -> Result<(StatusCode, Json<TaskAcceptedDto>), AppError> {
    let run = orchestrator.dispatch_dbt_commands(org_id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(TaskAcceptedDto {
            task_id: run.run_id,
        }),
    ))
}

/// 重新克隆已登记的 dbt 仓库
pub async fn clone_repo(
    OrgId(org_id): OrgId,
    Extension(orchestrator): Extension<TaskOrchestrator>,
) -> Result<(StatusCode, Json<TaskAcceptedDto>), AppError> {
    let run = orchestrator.dispatch_clone_repo(org_id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(TaskAcceptedDto {
            task_id: run.run_id,
        }),
    ))
}
