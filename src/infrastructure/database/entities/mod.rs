// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 组织、数据仓库、dbt 工作区、块与凭据表的 SeaORM 实体
pub mod org_blocks;
pub mod org_dbts;
pub mod org_secrets;
pub mod org_warehouses;
pub mod orgs;
