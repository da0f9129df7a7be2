// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// dbt 工作区搭建请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSetupRequest {
    #[validate(url)]
    pub gitrepo_url: String,
    pub gitrepo_access_token: Option<String>,
    #[validate(nested)]
    pub profile: DbtProfileDto,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct DbtProfileDto {
    #[validate(length(min = 1, message = "target_configs_schema must not be empty"))]
    pub target_configs_schema: String,
}

impl WorkspaceSetupRequest {
    /// 空字符串视为未提供令牌
    pub fn access_token(&self) -> Option<&str> {
        self.gitrepo_access_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}
