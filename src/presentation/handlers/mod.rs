// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 每个处理器只做参数解析与调度，长时间工作交给编排器
pub mod airbyte_handler;
pub mod dbt_handler;
pub mod task_handler;
