// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod task;

use crate::airbyte::AirbyteService;
use crate::application::orchestrator::TaskOrchestrator;
use crate::presentation::handlers::{airbyte_handler, dbt_handler};
use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

/// 处理器共享的服务
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: TaskOrchestrator,
    pub airbyte: AirbyteService,
}

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由，尚未注入服务
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let org_routes = Router::new()
        .route("/v1/dbt/workspace", post(dbt_handler::setup_workspace))
        .route("/v1/dbt/git_pull", post(dbt_handler::clone_repo))
        .route("/v1/dbt/run", post(dbt_handler::run_dbt))
        .route(
            "/v1/airbyte/workspaces/{workspace_id}/connections",
            post(airbyte_handler::create_connection),
        )
        .route(
            "/v1/airbyte/workspaces/{workspace_id}/connections/{connection_id}",
            put(airbyte_handler::update_connection),
        )
        .route(
            "/v1/airbyte/workspaces/{workspace_id}/connections/{connection_id}/sync",
            post(airbyte_handler::sync_connection),
        );

    Router::new()
        .merge(public_routes)
        .merge(org_routes)
        .merge(task::task_routes())
}

/// 注入服务并加上请求追踪
pub fn app(state: AppState) -> Router {
    let progress = state.orchestrator.progress().clone();
    routes()
        .layer(Extension(state.orchestrator))
        .layer(Extension(state.airbyte))
        .layer(Extension(progress))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
