// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{create_org, setup_db};
use ddp_orchestrator::domain::repositories::secret_store::{git_token_secret_name, SecretStore};
use ddp_orchestrator::infrastructure::repositories::secret_store_impl::DatabaseSecretStore;

#[tokio::test]
async fn test_save_overwrites_and_delete_removes() {
    let db = setup_db().await;
    let store = DatabaseSecretStore::new(db.clone());
    let org_id = create_org(&db, "Acme", Some("acme")).await;
    let name = git_token_secret_name(org_id);

    assert_eq!(store.get(org_id, &name).await.unwrap(), None);

    store.save(org_id, &name, "ghp_one").await.unwrap();
    store.save(org_id, &name, "ghp_two").await.unwrap();
    assert_eq!(
        store.get(org_id, &name).await.unwrap().as_deref(),
        Some("ghp_two")
    );

    assert!(store.delete(org_id, &name).await.unwrap());
    assert!(!store.delete(org_id, &name).await.unwrap());
    assert_eq!(store.get(org_id, &name).await.unwrap(), None);
}

#[tokio::test]
async fn test_secrets_are_scoped_by_org() {
    let db = setup_db().await;
    let store = DatabaseSecretStore::new(db.clone());
    let acme = create_org(&db, "Acme", Some("acme")).await;
    let globex = create_org(&db, "Globex", Some("globex")).await;

    store.save(acme, "token", "a").await.unwrap();
    store.save(globex, "token", "g").await.unwrap();

    assert_eq!(store.get(acme, "token").await.unwrap().as_deref(), Some("a"));
    assert_eq!(store.get(globex, "token").await.unwrap().as_deref(), Some("g"));
}
