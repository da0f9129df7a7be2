// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::airbyte::catalog::{build_connection_payload, normalization_operator, ConnectionMode};
use crate::airbyte::models::{ConnectionRequest, DiscoverResponse, DiscoveredCatalog, JobResponse};
use crate::airbyte::traits::{AirbyteError, JobApi};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

const DISCOVERY_FAILED: &str = "Failed to get source schema catalogs";

fn require_id(field: &str, value: &str) -> Result<(), AirbyteError> {
    if value.trim().is_empty() {
        return Err(AirbyteError::Validation(format!(
            "{} must be a non-empty string",
            field
        )));
    }
    Ok(())
}

fn require_object(field: &str, value: &Value) -> Result<(), AirbyteError> {
    if !value.is_object() {
        return Err(AirbyteError::Validation(format!(
            "{} must be a JSON object",
            field
        )));
    }
    Ok(())
}

/// 响应必须包含 `field`
fn expect_field(response: Value, field: &str, context: &str) -> Result<Value, AirbyteError> {
    if response.get(field).is_none() {
        warn!("{}: response has no {}", context, field);
        return Err(AirbyteError::UnexpectedResponse(format!(
            "{}: missing {}",
            context, field
        )));
    }
    Ok(response)
}

/// 取出响应中的 `field`
fn take_field(mut response: Value, field: &str, context: &str) -> Result<Value, AirbyteError> {
    match response.get_mut(field) {
        Some(value) => Ok(value.take()),
        None => {
            warn!("{}: response has no {}", context, field);
            Err(AirbyteError::UnexpectedResponse(format!(
                "{}: missing {}",
                context, field
            )))
        }
    }
}

/// Airbyte 实体操作
///
/// 每个操作先校验输入，再调用作业 API，最后检查响应中的标识字段
#[derive(Clone)]
pub struct AirbyteService {
    api: Arc<dyn JobApi>,
}

impl AirbyteService {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        Self { api }
    }

    pub async fn list_workspaces(&self) -> Result<Value, AirbyteError> {
        let res = self.api.request("workspaces/list", json!({})).await?;
        take_field(res, "workspaces", "list workspaces")
    }

    pub async fn get_workspace(&self, workspace_id: &str) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        let res = self
            .api
            .request("workspaces/get", json!({"workspaceId": workspace_id}))
            .await?;
        expect_field(res, "workspaceId", "get workspace")
    }

    pub async fn set_workspace_name(
        &self,
        workspace_id: &str,
        name: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("name", name)?;
        self.api
            .request(
                "workspaces/update_name",
                json!({"workspaceId": workspace_id, "name": name}),
            )
            .await
    }

    pub async fn create_workspace(&self, name: &str) -> Result<Value, AirbyteError> {
        require_id("name", name)?;
        let res = self
            .api
            .request("workspaces/create", json!({"name": name}))
            .await?;
        expect_field(res, "workspaceId", "workspace not created")
    }

    pub async fn list_source_definitions(&self, workspace_id: &str) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        let res = self
            .api
            .request(
                "source_definitions/list_for_workspace",
                json!({"workspaceId": workspace_id}),
            )
            .await?;
        take_field(res, "sourceDefinitions", "list source definitions")
    }

    pub async fn get_source_definition_specification(
        &self,
        workspace_id: &str,
        sourcedef_id: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("sourcedef_id", sourcedef_id)?;
        let res = self
            .api
            .request(
                "source_definition_specifications/get",
                json!({"sourceDefinitionId": sourcedef_id, "workspaceId": workspace_id}),
            )
            .await?;
        take_field(res, "connectionSpecification", "source definition specification")
    }

    pub async fn list_sources(&self, workspace_id: &str) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        let res = self
            .api
            .request("sources/list", json!({"workspaceId": workspace_id}))
            .await?;
        take_field(res, "sources", "list sources")
    }

    pub async fn get_source(&self, workspace_id: &str, source_id: &str) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("source_id", source_id)?;
        let res = self
            .api
            .request("sources/get", json!({"sourceId": source_id}))
            .await?;
        expect_field(res, "sourceId", "get source")
    }

    pub async fn delete_source(&self, workspace_id: &str, source_id: &str) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("source_id", source_id)?;
        self.api
            .request("sources/delete", json!({"sourceId": source_id}))
            .await
    }

    pub async fn create_source(
        &self,
        workspace_id: &str,
        name: &str,
        sourcedef_id: &str,
        config: &Value,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("name", name)?;
        require_id("sourcedef_id", sourcedef_id)?;
        require_object("config", config)?;
        let res = self
            .api
            .request(
                "sources/create",
                json!({
                    "workspaceId": workspace_id,
                    "name": name,
                    "sourceDefinitionId": sourcedef_id,
                    "connectionConfiguration": config,
                }),
            )
            .await?;
        expect_field(res, "sourceId", "failed to create source")
    }

    pub async fn update_source(
        &self,
        source_id: &str,
        name: &str,
        config: &Value,
        sourcedef_id: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("source_id", source_id)?;
        require_id("name", name)?;
        require_object("config", config)?;
        require_id("sourcedef_id", sourcedef_id)?;
        let res = self
            .api
            .request(
                "sources/update",
                json!({
                    "sourceId": source_id,
                    "name": name,
                    "connectionConfiguration": config,
                    "sourceDefinitionId": sourcedef_id,
                }),
            )
            .await?;
        expect_field(res, "sourceId", "failed to update source")
    }

    pub async fn check_source_connection(
        &self,
        workspace_id: &str,
        sourcedef_id: &str,
        config: &Value,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("sourcedef_id", sourcedef_id)?;
        require_object("config", config)?;
        self.api
            .request(
                "scheduler/sources/check_connection",
                json!({
                    "sourceDefinitionId": sourcedef_id,
                    "connectionConfiguration": config,
                    "workspaceId": workspace_id,
                }),
            )
            .await
    }

    /// 获取数据源的流目录
    ///
    /// 远端返回作业失败或通用错误时，提取其中的消息构造 `Discovery` 错误
    pub async fn discover_schema(
        &self,
        workspace_id: &str,
        source_id: &str,
    ) -> Result<DiscoveredCatalog, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("source_id", source_id)?;
        let res = self
            .api
            .request("sources/discover_schema", json!({"sourceId": source_id}))
            .await?;

        let decoded = DiscoverResponse::deserialize(&res)
            .map_err(|e| AirbyteError::UnexpectedResponse(e.to_string()))?;
        match decoded {
            DiscoverResponse::Catalog(catalog) => Ok(catalog),
            DiscoverResponse::JobFailure(failure) if failure.is_failure() => {
                Err(AirbyteError::Discovery {
                    detail: DISCOVERY_FAILED.to_string(),
                    errors: failure
                        .job_info
                        .failure_reason
                        .and_then(|reason| reason.external_message)
                        .unwrap_or_else(|| "job failed without a reason".to_string()),
                })
            }
            DiscoverResponse::Error(body) => Err(AirbyteError::Discovery {
                detail: DISCOVERY_FAILED.to_string(),
                errors: body.message,
            }),
            DiscoverResponse::JobFailure(_) | DiscoverResponse::Other(_) => {
                let reason = match DiscoveredCatalog::deserialize(&res) {
                    Err(e) => e.to_string(),
                    Ok(_) => "neither a catalog nor an error".to_string(),
                };
                warn!("discover_schema returned an unreadable catalog: {}", reason);
                Err(AirbyteError::UnexpectedResponse(format!(
                    "discover_schema returned an unreadable catalog: {}",
                    reason
                )))
            }
        }
    }

    pub async fn list_destination_definitions(
        &self,
        workspace_id: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        let res = self
            .api
            .request(
                "destination_definitions/list_for_workspace",
                json!({"workspaceId": workspace_id}),
            )
            .await?;
        take_field(res, "destinationDefinitions", "list destination definitions")
    }

    pub async fn get_destination_definition_specification(
        &self,
        workspace_id: &str,
        destinationdef_id: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("destinationdef_id", destinationdef_id)?;
        let res = self
            .api
            .request(
                "destination_definition_specifications/get",
                json!({"destinationDefinitionId": destinationdef_id, "workspaceId": workspace_id}),
            )
            .await?;
        take_field(
            res,
            "connectionSpecification",
            "destination definition specification",
        )
    }

    pub async fn list_destinations(&self, workspace_id: &str) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        let res = self
            .api
            .request("destinations/list", json!({"workspaceId": workspace_id}))
            .await?;
        take_field(res, "destinations", "list destinations")
    }

    pub async fn get_destination(
        &self,
        workspace_id: &str,
        destination_id: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("destination_id", destination_id)?;
        let res = self
            .api
            .request("destinations/get", json!({"destinationId": destination_id}))
            .await?;
        expect_field(res, "destinationId", "get destination")
    }

    pub async fn create_destination(
        &self,
        workspace_id: &str,
        name: &str,
        destinationdef_id: &str,
        config: &Value,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("name", name)?;
        require_id("destinationdef_id", destinationdef_id)?;
        require_object("config", config)?;
        let res = self
            .api
            .request(
                "destinations/create",
                json!({
                    "workspaceId": workspace_id,
                    "name": name,
                    "destinationDefinitionId": destinationdef_id,
                    "connectionConfiguration": config,
                }),
            )
            .await?;
        expect_field(res, "destinationId", "failed to create destination")
    }

    pub async fn update_destination(
        &self,
        destination_id: &str,
        name: &str,
        config: &Value,
        destinationdef_id: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("destination_id", destination_id)?;
        require_id("name", name)?;
        require_object("config", config)?;
        require_id("destinationdef_id", destinationdef_id)?;
        let res = self
            .api
            .request(
                "destinations/update",
                json!({
                    "destinationId": destination_id,
                    "name": name,
                    "connectionConfiguration": config,
                    "destinationDefinitionId": destinationdef_id,
                }),
            )
            .await?;
        expect_field(res, "destinationId", "failed to update destination")
    }

    pub async fn check_destination_connection(
        &self,
        workspace_id: &str,
        destinationdef_id: &str,
        config: &Value,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("destinationdef_id", destinationdef_id)?;
        require_object("config", config)?;
        self.api
            .request(
                "scheduler/destinations/check_connection",
                json!({
                    "destinationDefinitionId": destinationdef_id,
                    "connectionConfiguration": config,
                    "workspaceId": workspace_id,
                }),
            )
            .await
    }

    pub async fn list_connections(&self, workspace_id: &str) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        let res = self
            .api
            .request("connections/list", json!({"workspaceId": workspace_id}))
            .await?;
        take_field(res, "connections", "list connections")
    }

    pub async fn get_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("connection_id", connection_id)?;
        let res = self
            .api
            .request("connections/get", json!({"connectionId": connection_id}))
            .await?;
        expect_field(res, "connectionId", "get connection")
    }

    fn validate_connection_request(request: &ConnectionRequest) -> Result<(), AirbyteError> {
        if request.streams.is_empty() {
            return Err(AirbyteError::Validation(
                "must specify at least one stream".to_string(),
            ));
        }
        request.validate()?;
        Ok(())
    }

    /// 创建连接
    ///
    /// 每次都重新获取数据源目录。请求规范化时先创建规范化操作。
    pub async fn create_connection(
        &self,
        workspace_id: &str,
        request: &ConnectionRequest,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        Self::validate_connection_request(request)?;

        let catalog = self.discover_schema(workspace_id, &request.source_id).await?;
        let operation_id = if request.normalize {
            Some(self.create_normalization_operation(workspace_id).await?)
        } else {
            None
        };

        let payload = build_connection_payload(
            ConnectionMode::Create {
                normalization_operation_id: operation_id.as_deref(),
            },
            request,
            &catalog,
        );
        let payload = serde_json::to_value(&payload)
            .map_err(|e| AirbyteError::Validation(e.to_string()))?;

        let res = self.api.request("connections/create", payload).await?;
        expect_field(res, "connectionId", "failed to create connection")
    }

    /// 更新连接，同样每次重新获取目录
    pub async fn update_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
        request: &ConnectionRequest,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("connection_id", connection_id)?;
        Self::validate_connection_request(request)?;

        let catalog = self.discover_schema(workspace_id, &request.source_id).await?;
        let payload = build_connection_payload(
            ConnectionMode::Update {
                connection_id,
                workspace_id,
            },
            request,
            &catalog,
        );
        let payload = serde_json::to_value(&payload)
            .map_err(|e| AirbyteError::Validation(e.to_string()))?;

        let res = self.api.request("connections/update", payload).await?;
        expect_field(res, "connectionId", "failed to update connection")
    }

    pub async fn delete_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
    ) -> Result<Value, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("connection_id", connection_id)?;
        info!("Deleting connection: {}", connection_id);
        self.api
            .request("connections/delete", json!({"connectionId": connection_id}))
            .await
    }

    /// 触发连接同步，返回远端作业
    pub async fn sync_connection(
        &self,
        workspace_id: &str,
        connection_id: &str,
    ) -> Result<JobResponse, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        require_id("connection_id", connection_id)?;
        info!("Syncing connection: {}", connection_id);
        let res = self
            .api
            .request("connections/sync", json!({"connectionId": connection_id}))
            .await?;
        serde_json::from_value(res).map_err(|e| AirbyteError::UnexpectedResponse(e.to_string()))
    }

    pub async fn create_normalization_operation(
        &self,
        workspace_id: &str,
    ) -> Result<String, AirbyteError> {
        require_id("workspace_id", workspace_id)?;
        info!("creating normalization operation");
        let res = self
            .api
            .request(
                "/operations/create",
                json!({
                    "workspaceId": workspace_id,
                    "name": "op-normalize",
                    "operatorConfiguration": normalization_operator(),
                }),
            )
            .await?;
        take_field(res, "operationId", "create normalization operation")?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AirbyteError::UnexpectedResponse("operationId is not a string".to_string())
            })
    }

    pub async fn get_job(&self, job_id: i64) -> Result<JobResponse, AirbyteError> {
        let res = self.api.request("jobs/get", json!({"id": job_id})).await?;
        serde_json::from_value(res).map_err(|e| AirbyteError::UnexpectedResponse(e.to_string()))
    }

    pub async fn get_job_debug_info(&self, job_id: i64) -> Result<Value, AirbyteError> {
        self.api
            .request("jobs/get_debug_info", json!({"id": job_id}))
            .await
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
