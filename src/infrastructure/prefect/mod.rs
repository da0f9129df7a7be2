// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Prefect 代理模块
///
/// 通过 prefect-proxy 读取组织登记的块
pub mod profile_client;
