// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{fail, RunOutcome, TaskOrchestrator};
use crate::airbyte::models::JobStatus;
use crate::domain::models::progress::ProgressEvent;
use crate::domain::services::progress_channel::{ProgressError, RunProgress};
use tokio::time::Instant;
use tracing::{debug, warn};

impl TaskOrchestrator {
    /// 触发同步作业并轮询直至结束或超时
    pub(super) async fn sync_connection(
        &self,
        run: &RunProgress,
        workspace_id: &str,
        connection_id: &str,
    ) -> Result<RunOutcome, ProgressError> {
        let job = match self.airbyte.sync_connection(workspace_id, connection_id).await {
            Ok(res) => res.job,
            Err(e) => return fail(run, "could not start sync", Some(e.to_string())).await,
        };
        run.emit(ProgressEvent::running(format!(
            "sync job {} {}",
            job.id, job.status
        )))
        .await?;

        let deadline = Instant::now() + self.config.sync_max_wait;
        let mut last_status = job.status;
        loop {
            if let Some(outcome) = finish_if_terminal(run, job.id, last_status).await? {
                return Ok(outcome);
            }
            if Instant::now() >= deadline {
                warn!("Sync job {} still {} at deadline", job.id, last_status);
                return fail(
                    run,
                    "sync timed out",
                    Some(format!("job {} still {}", job.id, last_status)),
                )
                .await;
            }

            tokio::time::sleep(self.config.sync_poll_interval).await;

            let status = match self.airbyte.get_job(job.id).await {
                Ok(res) => res.job.status,
                Err(e) => {
                    return fail(run, "could not read sync job", Some(e.to_string())).await;
                }
            };
            debug!("Sync job {} polled: {}", job.id, status);
            if status != last_status {
                last_status = status;
                if !status.is_terminal() {
                    run.emit(ProgressEvent::running(format!(
                        "sync job {} {}",
                        job.id, status
                    )))
                    .await?;
                }
            }
        }
    }
}

async fn finish_if_terminal(
    run: &RunProgress,
    job_id: i64,
    status: JobStatus,
) -> Result<Option<RunOutcome>, ProgressError> {
    match status {
        JobStatus::Succeeded => {
            run.emit(ProgressEvent::completed(format!("sync job {} succeeded", job_id)))
                .await?;
            Ok(Some(RunOutcome::Succeeded))
        }
        JobStatus::Failed | JobStatus::Cancelled => {
            fail(run, &format!("sync job {} {}", job_id, status), None)
                .await
                .map(Some)
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "connection_sync_test.rs"]
mod tests;
