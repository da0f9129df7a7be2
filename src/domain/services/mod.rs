// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 进度通道（progress_channel）：运行事件的追加与回放
/// - 锁注册表（lock_registry）：按资源的咨询锁与过期清理
pub mod lock_registry;
pub mod progress_channel;
