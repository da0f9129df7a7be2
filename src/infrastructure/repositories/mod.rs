// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 基于 SeaORM 的组织仓库与凭据存储
pub mod org_repo_impl;
pub mod secret_store_impl;
