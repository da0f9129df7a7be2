// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Airbyte 错误类型
///
/// 远端原始响应不会原样透出，只保留一条可读消息和结构化细节
#[derive(Error, Debug)]
pub enum AirbyteError {
    /// 输入缺失或格式错误，在任何远端调用之前抛出
    #[error("Validation error: {0}")]
    Validation(String),
    /// 无法连接 Airbyte 服务器或请求超时
    #[error("Error connecting to Airbyte server: {0}")]
    Connectivity(String),
    /// 远端返回非 2xx 状态
    #[error("Airbyte returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// 数据源 schema 发现失败
    #[error("{detail}: {errors}")]
    Discovery { detail: String, errors: String },
    /// 远端响应缺少必需字段
    #[error("Unexpected Airbyte response: {0}")]
    UnexpectedResponse(String),
}

impl From<validator::ValidationErrors> for AirbyteError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AirbyteError::Validation(errors.to_string())
    }
}

/// 作业 API 特质
///
/// 对远端 HTTP 作业接口的一次请求/响应调用
#[async_trait]
pub trait JobApi: Send + Sync {
    /// 向指定端点发送 JSON 请求
    ///
    /// # 参数
    ///
    /// * `endpoint` - 版本化根路径下的端点，例如 `sources/get`
    /// * `payload` - 请求体
    async fn request(&self, endpoint: &str, payload: Value) -> Result<Value, AirbyteError>;
}
