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
        manager
            .create_table(
                Table::create()
                    .table(OrgSecrets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrgSecrets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrgSecrets::OrgId).integer().not_null())
                    .col(ColumnDef::new(OrgSecrets::Name).string().not_null())
                    .col(ColumnDef::new(OrgSecrets::Value).text().not_null())
                    .col(
                        ColumnDef::new(OrgSecrets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_org_secrets_org_name")
                    .table(OrgSecrets::Table)
                    .col(OrgSecrets::OrgId)
                    .col(OrgSecrets::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrgSecrets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrgSecrets {
    Table,
    Id,
    OrgId,
    Name,
    Value,
    UpdatedAt,
}
