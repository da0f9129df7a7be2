// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // dbt workspaces first, orgs reference them
        manager
            .create_table(
                Table::create()
                    .table(OrgDbts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrgDbts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrgDbts::GitrepoUrl).string().not_null())
                    .col(ColumnDef::new(OrgDbts::ProjectDir).string().not_null())
                    .col(ColumnDef::new(OrgDbts::DbtVenv).string().not_null())
                    .col(ColumnDef::new(OrgDbts::TargetType).string().not_null())
                    .col(ColumnDef::new(OrgDbts::DefaultSchema).string().not_null())
                    .col(ColumnDef::new(OrgDbts::TransformType).string().not_null())
                    .col(
                        ColumnDef::new(OrgDbts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orgs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orgs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orgs::Name).string().not_null())
                    .col(ColumnDef::new(Orgs::Slug).string().null())
                    .col(ColumnDef::new(Orgs::DbtId).integer().null())
                    .col(
                        ColumnDef::new(Orgs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orgs_dbt_id")
                            .from(Orgs::Table, Orgs::DbtId)
                            .to(OrgDbts::Table, OrgDbts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrgWarehouses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrgWarehouses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrgWarehouses::OrgId).integer().not_null())
                    .col(ColumnDef::new(OrgWarehouses::Wtype).string().not_null())
                    .col(ColumnDef::new(OrgWarehouses::Name).string().not_null())
                    .col(ColumnDef::new(OrgWarehouses::BqLocation).string().null())
                    .col(
                        ColumnDef::new(OrgWarehouses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_warehouses_org_id")
                            .from(OrgWarehouses::Table, OrgWarehouses::OrgId)
                            .to(Orgs::Table, Orgs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrgBlocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrgBlocks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrgBlocks::OrgId).integer().not_null())
                    .col(ColumnDef::new(OrgBlocks::BlockType).string().not_null())
                    .col(ColumnDef::new(OrgBlocks::BlockName).string().not_null())
                    .col(
                        ColumnDef::new(OrgBlocks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_blocks_org_id")
                            .from(OrgBlocks::Table, OrgBlocks::OrgId)
                            .to(Orgs::Table, Orgs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_org_blocks_org_type")
                    .table(OrgBlocks::Table)
                    .col(OrgBlocks::OrgId)
                    .col(OrgBlocks::BlockType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrgBlocks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrgWarehouses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orgs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrgDbts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orgs {
    Table,
    Id,
    Name,
    Slug,
    DbtId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrgDbts {
    Table,
    Id,
    GitrepoUrl,
    ProjectDir,
    DbtVenv,
    TargetType,
    DefaultSchema,
    TransformType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrgWarehouses {
    Table,
    Id,
    OrgId,
    Wtype,
    Name,
    BqLocation,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrgBlocks {
    Table,
    Id,
    OrgId,
    BlockType,
    BlockName,
    CreatedAt,
}
