// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::task_response::TaskProgressDto;
use crate::domain::services::progress_channel::ProgressChannel;
use crate::presentation::errors::AppError;
use axum::extract::{Extension, Path};
use axum::Json;

/// 查询运行进度
///
/// 返回按顺序排列的事件和当前状态，运行不存在或已过期时返回 404
pub async fn get_task_progress(
    Extension(progress): Extension<ProgressChannel>,
    Path(run_id): Path<String>,
) -> Result<Json<TaskProgressDto>, AppError> {
    let record = progress.record(&run_id).await?;
    Ok(Json(record.into()))
}
