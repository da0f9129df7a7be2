// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{OrchestratorConfig, TaskOrchestrator};
use crate::airbyte::testing::ScriptedJobApi;
use crate::airbyte::AirbyteService;
use crate::domain::models::org::{Org, OrgDbt, OrgWarehouse};
use crate::domain::models::progress::ProgressEvent;
use crate::domain::repositories::org_repository::MockOrgRepository;
use crate::domain::repositories::profile_block_source::MockProfileBlockSource;
use crate::domain::repositories::secret_store::MockSecretStore;
use crate::domain::services::lock_registry::LockRegistry;
use crate::domain::services::progress_channel::ProgressChannel;
use crate::executors::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use crate::infrastructure::cache::memory_store::MemoryStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

type Behaviour = dyn Fn(&CommandSpec) -> Result<CommandOutput, CommandError> + Send + Sync;

/// 记录命令并按预设行为返回结果的执行器
pub struct FakeRunner {
    specs: Mutex<Vec<CommandSpec>>,
    behaviour: Box<Behaviour>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::with_behaviour(succeed)
    }

    pub fn with_behaviour(
        behaviour: impl Fn(&CommandSpec) -> Result<CommandOutput, CommandError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            specs: Mutex::new(Vec::new()),
            behaviour: Box::new(behaviour),
        }
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        self.specs.lock().unwrap().clone()
    }

    /// 参数中包含 `arg` 的调用次数
    pub fn count_with_arg(&self, arg: &str) -> usize {
        self.specs
            .lock()
            .unwrap()
            .iter()
            .filter(|spec| spec.args.iter().any(|a| a == arg))
            .count()
    }
}

/// 默认行为：git clone 会在目标目录写入 README.md，其他命令回显自身
pub fn succeed(spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
    if spec.program == "git" && spec.args.first().map(String::as_str) == Some("clone") {
        let target = spec.cwd.join(spec.args.last().unwrap());
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("README.md"), "# dbt project\n").unwrap();
    }
    Ok(CommandOutput {
        stdout: format!("{} ok\ndone\n", spec),
        stderr: String::new(),
    })
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.specs.lock().unwrap().push(spec.clone());
        (self.behaviour)(spec)
    }
}

/// 编排器测试夹具：先配置 mock，再调用 `build`
pub struct Harness {
    pub orgs: MockOrgRepository,
    pub secrets: MockSecretStore,
    pub profiles: MockProfileBlockSource,
    pub runner: Arc<FakeRunner>,
    pub api: Arc<ScriptedJobApi>,
    pub root: TempDir,
}

pub struct Built {
    pub orchestrator: TaskOrchestrator,
    pub progress: ProgressChannel,
    pub locks: LockRegistry,
    pub runner: Arc<FakeRunner>,
    pub api: Arc<ScriptedJobApi>,
    pub root: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            orgs: MockOrgRepository::new(),
            secrets: MockSecretStore::new(),
            profiles: MockProfileBlockSource::new(),
            runner: Arc::new(FakeRunner::new()),
            api: Arc::new(ScriptedJobApi::new()),
            root: TempDir::new().unwrap(),
        }
    }

    pub fn clientdbt_root(&self) -> PathBuf {
        self.root.path().join("clientdbt")
    }

    pub fn build(self) -> Built {
        let store = Arc::new(MemoryStore::new());
        let progress = ProgressChannel::new(store.clone(), Duration::from_secs(3600));
        let locks = LockRegistry::new(store, Duration::from_secs(3600));
        let config = OrchestratorConfig {
            clientdbt_root: self.root.path().join("clientdbt"),
            dbt_venv: self.root.path().join("dbt"),
            sync_poll_interval: Duration::from_secs(5),
            sync_max_wait: Duration::from_secs(60),
        };
        let orchestrator = TaskOrchestrator::new(
            progress.clone(),
            locks.clone(),
            Arc::new(self.orgs),
            Arc::new(self.secrets),
            Arc::new(self.profiles),
            self.runner.clone(),
            AirbyteService::new(self.api.clone()),
            config,
        );
        Built {
            orchestrator,
            progress,
            locks,
            runner: self.runner,
            api: self.api,
            root: self.root,
        }
    }
}

impl Built {
    /// 等待运行结束并返回全部事件
    pub async fn finish(&self, run: super::DispatchedRun) -> Vec<ProgressEvent> {
        let run_id = run.run_id.clone();
        run.handle.await.unwrap();
        self.progress.read(&run_id).await.unwrap()
    }
}

pub fn sample_org(org_id: i32, slug: Option<&str>) -> Org {
    Org {
        id: org_id,
        name: "Acme Analytics".to_string(),
        slug: slug.map(str::to_string),
        dbt_id: None,
    }
}

pub fn sample_warehouse(org_id: i32) -> OrgWarehouse {
    OrgWarehouse {
        id: 10,
        org_id,
        wtype: "postgres".to_string(),
        name: "main".to_string(),
        bq_location: None,
    }
}

pub fn sample_orgdbt(project_dir: &Path, dbt_venv: &Path) -> OrgDbt {
    OrgDbt {
        id: 7,
        gitrepo_url: "https://github.com/acme/dbt.git".to_string(),
        project_dir: project_dir.to_string_lossy().into_owned(),
        dbt_venv: dbt_venv.to_string_lossy().into_owned(),
        target_type: "postgres".to_string(),
        default_schema: "analytics".to_string(),
        transform_type: "github".to_string(),
    }
}

pub fn messages(events: &[ProgressEvent]) -> Vec<&str> {
    events.iter().map(|e| e.message.as_str()).collect()
}
