// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::airbyte::models::{
    CatalogEntry, ConnectionPayload, ConnectionRequest, DiscoveredCatalog, NamespaceDefinition,
    StreamSelection, SyncCatalog,
};
use serde_json::{json, Value};
use std::collections::HashMap;

const SOURCE_NAMESPACE_FORMAT: &str = "${SOURCE_NAMESPACE}";
const NON_BREAKING_CHANGES_PREFERENCE: &str = "ignore";
const SCHEDULE_TYPE: &str = "manual";
const GEOGRAPHY: &str = "auto";

/// 连接请求的类型
#[derive(Debug, Clone, Copy)]
pub enum ConnectionMode<'a> {
    /// 新建连接，规范化时引用已创建的操作
    Create {
        normalization_operation_id: Option<&'a str>,
    },
    /// 更新已有连接，规范化时内联操作定义
    Update {
        connection_id: &'a str,
        workspace_id: &'a str,
    },
}

/// 按调用方选择过滤发现目录
///
/// 选择按名称索引，重名时后者生效。只有匹配且 `selected` 的流会保留，
/// 并用选择中的同步方式覆盖目录配置。
pub fn select_streams(
    catalog: &DiscoveredCatalog,
    selections: &[StreamSelection],
) -> Vec<CatalogEntry> {
    let by_name: HashMap<&str, &StreamSelection> = selections
        .iter()
        .map(|selection| (selection.name.as_str(), selection))
        .collect();

    catalog
        .catalog
        .streams
        .iter()
        .filter_map(|entry| {
            let selection = by_name.get(entry.stream.name.as_str())?;
            if !selection.selected {
                return None;
            }
            let mut entry = entry.clone();
            entry.config.sync_mode = Some(selection.sync_mode.as_str().to_string());
            entry.config.destination_sync_mode =
                Some(selection.destination_sync_mode.as_str().to_string());
            Some(entry)
        })
        .collect()
}

/// 规范化操作的配置
pub fn normalization_operator() -> Value {
    json!({
        "operatorType": "normalization",
        "normalization": {"option": "basic"},
    })
}

/// 组装连接请求体
pub fn build_connection_payload(
    mode: ConnectionMode<'_>,
    request: &ConnectionRequest,
    catalog: &DiscoveredCatalog,
) -> ConnectionPayload {
    let (namespace_definition, namespace_format) = match request
        .destination_schema
        .as_deref()
        .filter(|schema| !schema.is_empty())
    {
        Some(schema) => (NamespaceDefinition::Customformat, schema.to_string()),
        None => (
            NamespaceDefinition::Destination,
            SOURCE_NAMESPACE_FORMAT.to_string(),
        ),
    };

    let mut payload = ConnectionPayload {
        connection_id: None,
        source_id: request.source_id.clone(),
        destination_id: request.destination_id.clone(),
        source_catalog_id: catalog.catalog_id.clone(),
        sync_catalog: SyncCatalog {
            streams: select_streams(catalog, &request.streams),
        },
        status: None,
        prefix: String::new(),
        namespace_definition,
        namespace_format,
        non_breaking_changes_preference: NON_BREAKING_CHANGES_PREFERENCE.to_string(),
        schedule_type: SCHEDULE_TYPE.to_string(),
        geography: GEOGRAPHY.to_string(),
        name: request.name.clone(),
        operation_ids: None,
        operations: None,
    };

    match mode {
        ConnectionMode::Create {
            normalization_operation_id,
        } => {
            payload.status = Some("active".to_string());
            if request.normalize {
                payload.operation_ids = normalization_operation_id.map(|id| vec![id.to_string()]);
            }
        }
        ConnectionMode::Update {
            connection_id,
            workspace_id,
        } => {
            payload.connection_id = Some(connection_id.to_string());
            if request.normalize {
                payload.operations = Some(vec![json!({
                    "name": "Normalization",
                    "workspaceId": workspace_id,
                    "operatorConfiguration": normalization_operator(),
                })]);
            }
        }
    }

    payload
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
