// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的存储与外部数据接口，具体实现由基础设施层提供。
///
/// - 键值存储（kv_store）：进度与锁的共享存储
/// - 组织仓库（org_repository）：组织、仓库、dbt 工作区和块记录
/// - 凭据存储（secret_store）：组织级密钥
/// - profile 块来源（profile_block_source）：dbt CLI profile 内容
pub mod kv_store;
pub mod org_repository;
pub mod profile_block_source;
pub mod secret_store;
