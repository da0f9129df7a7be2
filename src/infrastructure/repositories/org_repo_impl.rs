// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;

use crate::domain::{
    models::org::{NewOrgDbt, Org, OrgBlock, OrgDbt, OrgWarehouse},
    repositories::org_repository::{OrgRepository, RepositoryError},
};
use crate::infrastructure::database::entities::{org_blocks, org_dbts, org_warehouses, orgs};

pub struct OrgRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl OrgRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<orgs::Model> for Org {
    fn from(model: orgs::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            dbt_id: model.dbt_id,
        }
    }
}

impl From<org_warehouses::Model> for OrgWarehouse {
    fn from(model: org_warehouses::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            wtype: model.wtype,
            name: model.name,
            bq_location: model.bq_location,
        }
    }
}

impl From<org_dbts::Model> for OrgDbt {
    fn from(model: org_dbts::Model) -> Self {
        Self {
            id: model.id,
            gitrepo_url: model.gitrepo_url,
            project_dir: model.project_dir,
            dbt_venv: model.dbt_venv,
            target_type: model.target_type,
            default_schema: model.default_schema,
            transform_type: model.transform_type,
        }
    }
}

impl From<org_blocks::Model> for OrgBlock {
    fn from(model: org_blocks::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            block_type: model.block_type,
            block_name: model.block_name,
        }
    }
}

#[async_trait]
impl OrgRepository for OrgRepositoryImpl {
    async fn find_org(&self, org_id: i32) -> Result<Option<Org>, RepositoryError> {
        let org = orgs::Entity::find_by_id(org_id)
            .one(self.db.as_ref())
            .await?;
        Ok(org.map(Into::into))
    }

    async fn find_warehouse(&self, org_id: i32) -> Result<Option<OrgWarehouse>, RepositoryError> {
        let warehouse = org_warehouses::Entity::find()
            .filter(org_warehouses::Column::OrgId.eq(org_id))
            .order_by_asc(org_warehouses::Column::Id)
            .one(self.db.as_ref())
            .await?;
        Ok(warehouse.map(Into::into))
    }

    async fn save_slug(&self, org_id: i32, slug: &str) -> Result<(), RepositoryError> {
        let org = orgs::Entity::find_by_id(org_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: orgs::ActiveModel = org.into();
        active.slug = Set(Some(slug.to_string()));
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn find_dbt(&self, org_id: i32) -> Result<Option<OrgDbt>, RepositoryError> {
        let found = orgs::Entity::find_by_id(org_id)
            .find_also_related(org_dbts::Entity)
            .one(self.db.as_ref())
            .await?;
        Ok(found.and_then(|(_, dbt)| dbt).map(Into::into))
    }

    async fn create_dbt_and_link(
        &self,
        org_id: i32,
        dbt: NewOrgDbt,
    ) -> Result<OrgDbt, RepositoryError> {
        let txn = self.db.begin().await?;

        let org = orgs::Entity::find_by_id(org_id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let created = org_dbts::ActiveModel {
            gitrepo_url: Set(dbt.gitrepo_url),
            project_dir: Set(dbt.project_dir),
            dbt_venv: Set(dbt.dbt_venv),
            target_type: Set(dbt.target_type),
            default_schema: Set(dbt.default_schema),
            transform_type: Set(dbt.transform_type),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut active: orgs::ActiveModel = org.into();
        active.dbt_id = Set(Some(created.id));
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(created.into())
    }

    async fn find_block(
        &self,
        org_id: i32,
        block_type: &str,
    ) -> Result<Option<OrgBlock>, RepositoryError> {
        let block = org_blocks::Entity::find()
            .filter(org_blocks::Column::OrgId.eq(org_id))
            .filter(org_blocks::Column::BlockType.eq(block_type))
            .order_by_asc(org_blocks::Column::Id)
            .one(self.db.as_ref())
            .await?;
        Ok(block.map(Into::into))
    }
}
