// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use ddp_orchestrator::airbyte::client::AirbyteClient;
use ddp_orchestrator::airbyte::AirbyteService;
use ddp_orchestrator::application::orchestrator::{OrchestratorConfig, TaskOrchestrator};
use ddp_orchestrator::config::settings::Settings;
use ddp_orchestrator::domain::services::lock_registry::LockRegistry;
use ddp_orchestrator::domain::services::progress_channel::ProgressChannel;
use ddp_orchestrator::executors::ShellRunner;
use ddp_orchestrator::infrastructure::cache;
use ddp_orchestrator::infrastructure::database::connection;
use ddp_orchestrator::infrastructure::prefect::profile_client::PrefectProxyClient;
use ddp_orchestrator::infrastructure::repositories::org_repo_impl::OrgRepositoryImpl;
use ddp_orchestrator::infrastructure::repositories::secret_store_impl::DatabaseSecretStore;
use ddp_orchestrator::presentation::routes::{self, AppState};
use ddp_orchestrator::utils::telemetry;
use ddp_orchestrator::workers::manager::WorkerManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting ddp-orchestrator...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    ddp_orchestrator::infrastructure::metrics::init_metrics(&settings.metrics.listen_addr);

    // 3. Connect to database and apply migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    info!("Database connection established");

    // 4. Key-value store for progress and locks
    let store = cache::build_store(&settings)?;
    info!("Key-value store initialized ({:?})", settings.cache.backend);

    // 5. Initialize Components
    let progress = ProgressChannel::new(store.clone(), settings.progress.ttl());
    let locks = LockRegistry::new(store, settings.locks.stale_after());
    let airbyte = AirbyteService::new(Arc::new(AirbyteClient::new(&settings.airbyte)?));
    let orchestrator = TaskOrchestrator::new(
        progress,
        locks.clone(),
        Arc::new(OrgRepositoryImpl::new(db.clone())),
        Arc::new(DatabaseSecretStore::new(db)),
        Arc::new(PrefectProxyClient::new(&settings.prefect)?),
        Arc::new(ShellRunner::new(settings.dbt.command_timeout())),
        airbyte.clone(),
        OrchestratorConfig::from(&settings),
    );

    // 6. Start lock sweepers
    let mut worker_manager = WorkerManager::new(locks, settings.locks.clone());
    worker_manager.start_sweepers();

    // 7. Start HTTP server
    let app = routes::app(AppState {
        orchestrator,
        airbyte,
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => result?,
        _ = worker_manager.wait_for_shutdown() => {}
    }

    Ok(())
}
