// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化 Prometheus 指标导出
///
/// 地址无法解析或端口被占用时只记录警告，服务照常启动
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen_addr, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!("airbyte_requests_total", "Requests sent to the Airbyte API");
    describe_counter!(
        "airbyte_request_failures_total",
        "Airbyte requests that failed to connect or returned an error status"
    );
    describe_counter!("orchestrator_runs_total", "Background runs dispatched");
    describe_counter!(
        "orchestrator_run_failures_total",
        "Background runs that ended in the failed state"
    );
    describe_counter!("locks_swept_total", "Stale locks removed by the sweepers");

    info!("Metrics exporter listening on {}", addr);
}
