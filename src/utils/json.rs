// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

/// 递归删除 JSON 中所有名为 `attribute` 的字段
///
/// 用于在记录远端响应前去掉体积大、无诊断价值的字段（例如连接器图标）
pub fn remove_nested_attribute(value: Value, attribute: &str) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key != attribute)
                .map(|(key, inner)| (key, remove_nested_attribute(inner, attribute)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| remove_nested_attribute(item, attribute))
                .collect(),
        ),
        other => other,
    }
}
