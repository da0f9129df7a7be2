// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、Redis、服务器、Airbyte、dbt 以及后台任务等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置
    pub redis: RedisSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 键值存储后端配置
    pub cache: CacheSettings,
    /// 任务进度配置
    pub progress: ProgressSettings,
    /// 锁配置
    pub locks: LockSettings,
    /// Airbyte 服务器配置
    pub airbyte: AirbyteSettings,
    /// Prefect 代理配置
    pub prefect: PrefectSettings,
    /// dbt 工作区配置
    pub dbt: DbtSettings,
    /// 连接同步轮询配置
    pub sync: SyncSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// Redis配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: String,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 键值存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// Redis，多实例部署
    Redis,
    /// 进程内存，单实例或开发环境
    Memory,
}

/// 键值存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub backend: CacheBackend,
}

/// 任务进度配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressSettings {
    /// 进度记录保留时间（秒），每次写入都会刷新
    pub ttl_seconds: u64,
}

impl ProgressSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// 锁配置
#[derive(Debug, Clone, Deserialize)]
pub struct LockSettings {
    /// 锁被视为过期的时间（秒）
    pub stale_after_seconds: u64,
    /// 过期锁清理间隔（秒）
    pub sweep_interval_seconds: u64,
}

impl LockSettings {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

/// Airbyte 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct AirbyteSettings {
    pub host: String,
    pub port: u16,
    /// API 版本，例如 v1
    pub api_version: String,
    /// 静态访问令牌
    pub token: String,
    /// 单次请求超时（秒）
    pub timeout_seconds: u64,
}

impl AirbyteSettings {
    /// 版本化的 API 根路径
    pub fn base_url(&self) -> String {
        format!(
            "http://{}:{}/api/{}/",
            self.host, self.port, self.api_version
        )
    }
}

/// Prefect 代理配置
#[derive(Debug, Clone, Deserialize)]
pub struct PrefectSettings {
    pub proxy_url: String,
    pub timeout_seconds: u64,
}

/// dbt 工作区配置
#[derive(Debug, Clone, Deserialize)]
pub struct DbtSettings {
    /// 各组织 dbt 项目的根目录
    pub clientdbt_root: PathBuf,
    /// dbt 虚拟环境所在目录
    pub dbt_venv: PathBuf,
    /// 外部进程超时（秒），未设置时不限时
    pub command_timeout_seconds: Option<u64>,
}

impl DbtSettings {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_seconds.map(Duration::from_secs)
    }
}

/// 连接同步轮询配置
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    pub poll_interval_seconds: u64,
    pub max_wait_seconds: u64,
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8002)?
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("cache.backend", "redis")?
            .set_default("progress.ttl_seconds", 86400)?
            .set_default("locks.stale_after_seconds", 3600)?
            .set_default("locks.sweep_interval_seconds", 60)?
            // Airbyte defaults
            .set_default("airbyte.host", "localhost")?
            .set_default("airbyte.port", 8000)?
            .set_default("airbyte.api_version", "v1")?
            .set_default("airbyte.token", "")?
            .set_default("airbyte.timeout_seconds", 30)?
            .set_default("prefect.proxy_url", "http://localhost:8080")?
            .set_default("prefect.timeout_seconds", 30)?
            .set_default("dbt.clientdbt_root", "./clientdbt")?
            .set_default("dbt.dbt_venv", "./dbt")?
            .set_default("sync.poll_interval_seconds", 5)?
            .set_default("sync.max_wait_seconds", 3600)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("DDP").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
