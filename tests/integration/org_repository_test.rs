// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{create_block, create_org, create_warehouse, setup_db};
use ddp_orchestrator::domain::models::org::{NewOrgDbt, DBT_CLI_PROFILE};
use ddp_orchestrator::domain::repositories::org_repository::{OrgRepository, RepositoryError};
use ddp_orchestrator::infrastructure::database::entities::{org_dbts, orgs};
use ddp_orchestrator::infrastructure::repositories::org_repo_impl::OrgRepositoryImpl;
use sea_orm::EntityTrait;

fn new_dbt(project_dir: &str) -> NewOrgDbt {
    NewOrgDbt {
        gitrepo_url: "https://github.com/acme/dbt.git".to_string(),
        project_dir: project_dir.to_string(),
        dbt_venv: "/opt/dbt".to_string(),
        target_type: "postgres".to_string(),
        default_schema: "analytics".to_string(),
        transform_type: "github".to_string(),
    }
}

#[tokio::test]
async fn test_find_org_and_save_slug() {
    let db = setup_db().await;
    let repo = OrgRepositoryImpl::new(db.clone());
    let org_id = create_org(&db, "Acme Analytics", None).await;

    let org = repo.find_org(org_id).await.unwrap().unwrap();
    assert_eq!(org.name, "Acme Analytics");
    assert_eq!(org.slug, None);

    repo.save_slug(org_id, "acme-analytics").await.unwrap();
    let org = repo.find_org(org_id).await.unwrap().unwrap();
    assert_eq!(org.slug.as_deref(), Some("acme-analytics"));

    assert!(repo.find_org(org_id + 100).await.unwrap().is_none());
    assert!(matches!(
        repo.save_slug(org_id + 100, "x").await,
        Err(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_find_warehouse_and_block() {
    let db = setup_db().await;
    let repo = OrgRepositoryImpl::new(db.clone());
    let org_id = create_org(&db, "Acme", Some("acme")).await;

    assert!(repo.find_warehouse(org_id).await.unwrap().is_none());
    create_warehouse(&db, org_id, "bigquery").await;
    let warehouse = repo.find_warehouse(org_id).await.unwrap().unwrap();
    assert_eq!(warehouse.wtype, "bigquery");
    assert_eq!(warehouse.org_id, org_id);

    create_block(&db, org_id, "airbyte-connection", "conn-block").await;
    create_block(&db, org_id, DBT_CLI_PROFILE, "acme-profile").await;
    let block = repo.find_block(org_id, DBT_CLI_PROFILE).await.unwrap().unwrap();
    assert_eq!(block.block_name, "acme-profile");
    assert!(repo.find_block(org_id, "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_dbt_links_org() {
    let db = setup_db().await;
    let repo = OrgRepositoryImpl::new(db.clone());
    let org_id = create_org(&db, "Acme", Some("acme")).await;
    assert!(repo.find_dbt(org_id).await.unwrap().is_none());

    let created = repo
        .create_dbt_and_link(org_id, new_dbt("/srv/clientdbt/acme"))
        .await
        .unwrap();

    let org = repo.find_org(org_id).await.unwrap().unwrap();
    assert_eq!(org.dbt_id, Some(created.id));
    let found = repo.find_dbt(org_id).await.unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(found.project_dir, "/srv/clientdbt/acme");
}

#[tokio::test]
async fn test_create_dbt_for_missing_org_leaves_nothing_behind() {
    let db = setup_db().await;
    let repo = OrgRepositoryImpl::new(db.clone());

    let result = repo.create_dbt_and_link(999, new_dbt("/tmp/x")).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));

    assert!(org_dbts::Entity::find()
        .all(db.as_ref())
        .await
        .unwrap()
        .is_empty());
    assert!(orgs::Entity::find().all(db.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_setup_again_replaces_link() {
    let db = setup_db().await;
    let repo = OrgRepositoryImpl::new(db.clone());
    let org_id = create_org(&db, "Acme", Some("acme")).await;

    let first = repo
        .create_dbt_and_link(org_id, new_dbt("/srv/a"))
        .await
        .unwrap();
    let second = repo
        .create_dbt_and_link(org_id, new_dbt("/srv/b"))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(repo.find_dbt(org_id).await.unwrap().unwrap().project_dir, "/srv/b");
}
