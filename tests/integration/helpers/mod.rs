// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use ddp_orchestrator::airbyte::client::AirbyteClient;
use ddp_orchestrator::airbyte::AirbyteService;
use ddp_orchestrator::application::orchestrator::{OrchestratorConfig, TaskOrchestrator};
use ddp_orchestrator::config::settings::PrefectSettings;
use ddp_orchestrator::domain::models::progress::RunRecord;
use ddp_orchestrator::domain::services::lock_registry::LockRegistry;
use ddp_orchestrator::domain::services::progress_channel::ProgressChannel;
use ddp_orchestrator::executors::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use ddp_orchestrator::infrastructure::cache::memory_store::MemoryStore;
use ddp_orchestrator::infrastructure::database::entities::{org_blocks, org_warehouses, orgs};
use ddp_orchestrator::infrastructure::prefect::profile_client::PrefectProxyClient;
use ddp_orchestrator::infrastructure::repositories::org_repo_impl::OrgRepositoryImpl;
use ddp_orchestrator::infrastructure::repositories::secret_store_impl::DatabaseSecretStore;
use ddp_orchestrator::presentation::routes::{self, AppState};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;

pub async fn setup_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let db = Arc::new(db);
    Migrator::up(db.as_ref(), None).await.unwrap();
    db
}

pub async fn create_org(db: &DatabaseConnection, name: &str, slug: Option<&str>) -> i32 {
    let org = orgs::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug.map(str::to_string)),
        dbt_id: Set(None),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    org.insert(db).await.unwrap().id
}

pub async fn create_warehouse(db: &DatabaseConnection, org_id: i32, wtype: &str) {
    org_warehouses::ActiveModel {
        org_id: Set(org_id),
        wtype: Set(wtype.to_string()),
        name: Set("main".to_string()),
        bq_location: Set(None),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn create_block(db: &DatabaseConnection, org_id: i32, block_type: &str, name: &str) {
    org_blocks::ActiveModel {
        org_id: Set(org_id),
        block_type: Set(block_type.to_string()),
        block_name: Set(name.to_string()),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

/// 记录命令的执行器；git clone 会创建目标目录
#[derive(Default)]
pub struct RecordingRunner {
    specs: Mutex<Vec<CommandSpec>>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    /// 参数包含 `arg` 的命令以非零状态退出
    pub fn failing_on(arg: &str) -> Self {
        Self {
            specs: Mutex::new(Vec::new()),
            fail_on: Some(arg.to_string()),
        }
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        self.specs.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.specs.lock().unwrap().push(spec.clone());

        if let Some(arg) = &self.fail_on {
            if spec.args.iter().any(|a| a == arg) {
                return Err(CommandError::Failed {
                    command: spec.to_string(),
                    code: Some(1),
                    stdout: format!("Running {}\nCompilation Error", arg),
                    stderr: String::new(),
                });
            }
        }

        if spec.program == "git" {
            let target = spec.cwd.join(spec.args.last().unwrap());
            std::fs::create_dir_all(target.join("models")).unwrap();
            std::fs::write(target.join("dbt_project.yml"), "name: acme\n").unwrap();
        }
        Ok(CommandOutput {
            stdout: format!("{}\nDone.", spec),
            stderr: String::new(),
        })
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub progress: ProgressChannel,
    pub locks: LockRegistry,
    pub runner: Arc<RecordingRunner>,
    pub airbyte: MockServer,
    pub prefect: MockServer,
    pub root: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_runner(RecordingRunner::default()).await
}

pub async fn spawn_app_with_runner(runner: RecordingRunner) -> TestApp {
    let db = setup_db().await;
    let airbyte = MockServer::start().await;
    let prefect = MockServer::start().await;
    let root = TempDir::new().unwrap();
    let runner = Arc::new(runner);

    let store = Arc::new(MemoryStore::new());
    let progress = ProgressChannel::new(store.clone(), Duration::from_secs(3600));
    let locks = LockRegistry::new(store, Duration::from_secs(3600));

    let client = AirbyteClient::with_base_url(
        format!("{}/api/v1/", airbyte.uri()),
        "dGVzdDp0ZXN0",
        Duration::from_secs(5),
    )
    .unwrap();
    let airbyte_service = AirbyteService::new(Arc::new(client));
    let profiles = PrefectProxyClient::new(&PrefectSettings {
        proxy_url: prefect.uri(),
        timeout_seconds: 5,
    })
    .unwrap();

    let orchestrator = TaskOrchestrator::new(
        progress.clone(),
        locks.clone(),
        Arc::new(OrgRepositoryImpl::new(db.clone())),
        Arc::new(DatabaseSecretStore::new(db.clone())),
        Arc::new(profiles),
        runner.clone(),
        airbyte_service.clone(),
        OrchestratorConfig {
            clientdbt_root: root.path().join("clientdbt"),
            dbt_venv: root.path().join("dbt"),
            sync_poll_interval: Duration::from_millis(10),
            sync_max_wait: Duration::from_secs(5),
        },
    );

    let app = routes::app(AppState {
        orchestrator,
        airbyte: airbyte_service,
    });
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        db,
        progress,
        locks,
        runner,
        airbyte,
        prefect,
        root,
    }
}

/// 轮询直到运行进入终态
pub async fn wait_for_terminal(progress: &ProgressChannel, run_id: &str) -> RunRecord {
    for _ in 0..500 {
        let record = progress.record(run_id).await.unwrap();
        if record.is_terminal() {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run {} did not finish", run_id);
}
