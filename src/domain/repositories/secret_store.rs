// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::org_repository::RepositoryError;
use async_trait::async_trait;

/// 组织凭据存储
///
/// 以 (org_id, name) 为键，重复写入覆盖旧值
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn save(&self, org_id: i32, name: &str, value: &str) -> Result<(), RepositoryError>;
    async fn get(&self, org_id: i32, name: &str) -> Result<Option<String>, RepositoryError>;
    /// 返回是否删除了记录
    async fn delete(&self, org_id: i32, name: &str) -> Result<bool, RepositoryError>;
}

/// 组织 git 访问令牌的凭据名
pub fn git_token_secret_name(org_id: i32) -> String {
    format!("gitrepoAccessToken-org-{}", org_id)
}
