// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 键值存储的两种实现：Redis 与进程内存
pub mod memory_store;
pub mod redis_client;

use crate::config::settings::{CacheBackend, Settings};
use crate::domain::repositories::kv_store::{KeyValueStore, StoreError};
use std::sync::Arc;

/// 根据配置创建键值存储
pub fn build_store(settings: &Settings) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match settings.cache.backend {
        CacheBackend::Redis => Ok(Arc::new(redis_client::RedisClient::new(&settings.redis.url)?)),
        CacheBackend::Memory => Ok(Arc::new(memory_store::MemoryStore::new())),
    }
}
