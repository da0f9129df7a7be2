// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Airbyte 集成模块
///
/// - 作业 API 特质与错误（traits）
/// - HTTP 客户端（client）
/// - 请求与响应模型（models）
/// - 目录协商（catalog）
/// - 实体操作（service）
pub mod catalog;
pub mod client;
pub mod models;
pub mod service;
#[cfg(test)]
pub mod testing;
pub mod traits;

pub use service::AirbyteService;
pub use traits::{AirbyteError, JobApi};
