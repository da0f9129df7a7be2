// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义运行进度、锁以及组织相关的核心数据结构
pub mod lock;
pub mod org;
pub mod progress;
