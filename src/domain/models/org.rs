// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// dbt CLI profile 块类型
pub const DBT_CLI_PROFILE: &str = "dbt-cli-profile";

/// 组织
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Org {
    pub id: i32,
    pub name: String,
    /// 首次需要时由名称生成并持久化，之后复用
    pub slug: Option<String>,
    pub dbt_id: Option<i32>,
}

/// 组织的数据仓库配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgWarehouse {
    pub id: i32,
    pub org_id: i32,
    /// 仓库类型，例如 postgres、bigquery
    pub wtype: String,
    pub name: String,
    pub bq_location: Option<String>,
}

/// 组织的 dbt 工作区配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgDbt {
    pub id: i32,
    pub gitrepo_url: String,
    pub project_dir: String,
    pub dbt_venv: String,
    pub target_type: String,
    pub default_schema: String,
    pub transform_type: String,
}

/// 新建 dbt 工作区配置所需字段
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrgDbt {
    pub gitrepo_url: String,
    pub project_dir: String,
    pub dbt_venv: String,
    pub target_type: String,
    pub default_schema: String,
    pub transform_type: String,
}

/// 组织在远端（Prefect）登记的块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgBlock {
    pub id: i32,
    pub org_id: i32,
    pub block_type: String,
    pub block_name: String,
}
