// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::airbyte::models::ConnectionRequest;
use crate::airbyte::AirbyteService;
use crate::application::dto::task_response::TaskAcceptedDto;
use crate::application::orchestrator::TaskOrchestrator;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::org_id::OrgId;
use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde_json::Value;

pub async fn create_connection(
    OrgId(_org_id): OrgId,
    Extension(airbyte): Extension<AirbyteService>,
    Path(workspace_id): Path<String>,
    Json(payload): Json<ConnectionRequest>,
) -> Result<Json<Value>, AppError> {
    let connection = airbyte.create_connection(&workspace_id, &payload).await?;
    Ok(Json(connection))
}

pub async fn update_connection(
    OrgId(_org_id): OrgId,
    Extension(airbyte): Extension<AirbyteService>,
    Path((workspace_id, connection_id)): Path<(String, String)>,
    Json(payload): Json<ConnectionRequest>,
) -> Result<Json<Value>, AppError> {
    let connection = airbyte
        .update_connection(&workspace_id, &connection_id, &payload)
        .await?;
    Ok(Json(connection))
}

/// 触发同步，作业在后台轮询
pub async fn sync_connection(
    OrgId(org_id): OrgId,
    Extension(orchestrator): Extension<TaskOrchestrator>,
    Path((workspace_id, connection_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<TaskAcceptedDto>), AppError> {
    let run = orchestrator
        .dispatch_connection_sync(org_id, workspace_id, connection_id)
        .await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(TaskAcceptedDto {
            task_id: run.run_id,
        }),
    ))
}
