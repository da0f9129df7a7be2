// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;

use crate::domain::repositories::{org_repository::RepositoryError, secret_store::SecretStore};
use crate::infrastructure::database::entities::org_secrets;

/// 数据库凭据存储
pub struct DatabaseSecretStore {
    db: Arc<DatabaseConnection>,
}

impl DatabaseSecretStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find(&self, org_id: i32, name: &str) -> Result<Option<org_secrets::Model>, RepositoryError> {
        Ok(org_secrets::Entity::find()
            .filter(org_secrets::Column::OrgId.eq(org_id))
            .filter(org_secrets::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await?)
    }
}

#[async_trait]
impl SecretStore for DatabaseSecretStore {
    async fn save(&self, org_id: i32, name: &str, value: &str) -> Result<(), RepositoryError> {
        match self.find(org_id, name).await? {
            Some(existing) => {
                let mut active: org_secrets::ActiveModel = existing.into();
                active.value = Set(value.to_string());
                active.updated_at = Set(Utc::now().fixed_offset());
                active.update(self.db.as_ref()).await?;
            }
            None => {
                org_secrets::ActiveModel {
                    org_id: Set(org_id),
                    name: Set(name.to_string()),
                    value: Set(value.to_string()),
                    updated_at: Set(Utc::now().fixed_offset()),
                    ..Default::default()
                }
                .insert(self.db.as_ref())
                .await?;
            }
        }
        Ok(())
    }

    async fn get(&self, org_id: i32, name: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.find(org_id, name).await?.map(|secret| secret.value))
    }

    async fn delete(&self, org_id: i32, name: &str) -> Result<bool, RepositoryError> {
        let result = org_secrets::Entity::delete_many()
            .filter(org_secrets::Column::OrgId.eq(org_id))
            .filter(org_secrets::Column::Name.eq(name))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
