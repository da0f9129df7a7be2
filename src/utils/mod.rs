// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括遥测初始化、JSON 清理、slug 生成与 URL 凭据处理
pub mod errors;
pub mod json;
pub mod slug;
pub mod telemetry;
pub mod url_utils;
