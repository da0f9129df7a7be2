// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Airbyte 模块
///
/// 作业 API 客户端、目录协商与实体操作
pub mod airbyte;

/// 应用程序模块
///
/// 后台任务编排与请求数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心实体、进度通道、锁注册表和仓库接口
pub mod domain;

/// 外部进程模块
pub mod executors;

/// 基础设施模块
///
/// 提供外部服务集成，如数据库、键值存储、Prefect 代理等
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和提取器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 过期锁清理等后台维护任务
pub mod workers;
