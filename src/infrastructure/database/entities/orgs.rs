// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orgs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub slug: Option<String>,
    pub dbt_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::org_dbts::Entity",
        from = "Column::DbtId",
        to = "super::org_dbts::Column::Id",
        on_delete = "SetNull"
    )]
    OrgDbts,
    #[sea_orm(has_many = "super::org_warehouses::Entity")]
    OrgWarehouses,
    #[sea_orm(has_many = "super::org_blocks::Entity")]
    OrgBlocks,
}

impl Related<super::org_dbts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrgDbts.def()
    }
}

impl Related<super::org_warehouses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrgWarehouses.def()
    }
}

impl Related<super::org_blocks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrgBlocks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
