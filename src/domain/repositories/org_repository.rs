// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::org::{NewOrgDbt, Org, OrgBlock, OrgDbt, OrgWarehouse};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 组织仓库特质
///
/// 编排器读取与写回组织、仓库、dbt 工作区和块记录的接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrgRepository: Send + Sync {
    /// 根据ID查找组织
    async fn find_org(&self, org_id: i32) -> Result<Option<Org>, RepositoryError>;
    /// 查找组织的数据仓库
    async fn find_warehouse(&self, org_id: i32) -> Result<Option<OrgWarehouse>, RepositoryError>;
    /// 持久化组织 slug
    async fn save_slug(&self, org_id: i32, slug: &str) -> Result<(), RepositoryError>;
    /// 查找组织关联的 dbt 工作区
    async fn find_dbt(&self, org_id: i32) -> Result<Option<OrgDbt>, RepositoryError>;
    /// 创建 dbt 工作区记录并关联到组织（同一事务）
    async fn create_dbt_and_link(
        &self,
        org_id: i32,
        dbt: NewOrgDbt,
    ) -> Result<OrgDbt, RepositoryError>;
    /// 查找组织指定类型的块
    async fn find_block(
        &self,
        org_id: i32,
        block_type: &str,
    ) -> Result<Option<OrgBlock>, RepositoryError>;
}
