// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::lock::{Lock, LockNamespace, ResourceKey};
use crate::domain::repositories::kv_store::{KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 锁错误类型
#[derive(Error, Debug)]
pub enum LockError {
    /// 资源已被其他运行持有
    #[error("Resource {resource} is locked by {holder}")]
    Conflict { resource: String, holder: String },
    /// 存储错误
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 锁注册表
///
/// 基于共享键值存储的咨询锁。锁记录本身不带 TTL，
/// 超过阈值的锁视为过期：`acquire` 可以接管，清理任务会删除。
#[derive(Clone)]
pub struct LockRegistry {
    store: Arc<dyn KeyValueStore>,
    stale_after: Duration,
}

impl LockRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, stale_after: Duration) -> Self {
        Self { store, stale_after }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// 获取锁
    ///
    /// # 参数
    ///
    /// * `key` - 资源标识
    /// * `holder` - 持有者标识
    ///
    /// # 返回值
    ///
    /// * `Ok(Lock)` - 新创建的锁
    /// * `Err(LockError::Conflict)` - 资源已被未过期的锁持有
    pub async fn acquire(&self, key: &ResourceKey, holder: &str) -> Result<Lock, LockError> {
        let storage_key = key.storage_key();
        let lock = Lock::new(key.clone(), holder);
        let raw = serde_json::to_string(&lock).map_err(StoreError::from)?;

        if self.store.set_if_absent(&storage_key, &raw, None).await? {
            debug!("Lock {} acquired by {}", key, holder);
            return Ok(lock);
        }

        let Some(existing_raw) = self.store.get(&storage_key).await? else {
            // 在两次调用之间被释放
            return self.try_insert(key, lock, &raw).await;
        };

        match serde_json::from_str::<Lock>(&existing_raw) {
            Ok(existing) if !existing.is_stale(Utc::now(), self.stale_after) => {
                Err(LockError::Conflict {
                    resource: key.to_string(),
                    holder: existing.holder,
                })
            }
            Ok(existing) => {
                info!(
                    "Taking over stale lock {} held by {} since {}",
                    key, existing.holder, existing.locked_at
                );
                self.replace(key, lock, &raw, &existing_raw).await
            }
            Err(e) => {
                warn!("Replacing unreadable lock record {}: {}", key, e);
                self.replace(key, lock, &raw, &existing_raw).await
            }
        }
    }

    async fn replace(
        &self,
        key: &ResourceKey,
        lock: Lock,
        raw: &str,
        expected: &str,
    ) -> Result<Lock, LockError> {
        // 仅当记录未被他人改写时删除
        self.store
            .delete_if_equals(&key.storage_key(), expected)
            .await?;
        self.try_insert(key, lock, raw).await
    }

    async fn try_insert(&self, key: &ResourceKey, lock: Lock, raw: &str) -> Result<Lock, LockError> {
        if self.store.set_if_absent(&key.storage_key(), raw, None).await? {
            return Ok(lock);
        }
        let holder = self
            .get(key)
            .await?
            .map(|existing| existing.holder)
            .unwrap_or_default();
        Err(LockError::Conflict {
            resource: key.to_string(),
            holder,
        })
    }

    /// 释放锁，返回锁是否存在
    pub async fn release(&self, key: &ResourceKey) -> Result<bool, LockError> {
        let removed = self.store.delete(&key.storage_key()).await?;
        debug!("Lock {} released (existed: {})", key, removed);
        Ok(removed)
    }

    /// 读取当前锁记录
    pub async fn get(&self, key: &ResourceKey) -> Result<Option<Lock>, LockError> {
        let Some(raw) = self.store.get(&key.storage_key()).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(lock) => Ok(Some(lock)),
            Err(e) => {
                warn!("Ignoring unreadable lock record {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// 清理所有命名空间中超过阈值的锁
    pub async fn sweep_expired(&self, threshold: Duration) -> Result<u64, LockError> {
        let mut removed = 0;
        for namespace in LockNamespace::ALL {
            removed += self.sweep_namespace(namespace, threshold).await?;
        }
        Ok(removed)
    }

    /// 清理单个命名空间中超过阈值的锁
    pub async fn sweep_namespace(
        &self,
        namespace: LockNamespace,
        threshold: Duration,
    ) -> Result<u64, LockError> {
        self.sweep_namespace_as_of(namespace, Utc::now(), threshold)
            .await
    }

    /// 以给定时间为基准清理
    pub async fn sweep_namespace_as_of(
        &self,
        namespace: LockNamespace,
        now: DateTime<Utc>,
        threshold: Duration,
    ) -> Result<u64, LockError> {
        let removed = self
            .store
            .delete_matching(&namespace.key_prefix(), &|key, value| {
                match serde_json::from_str::<Lock>(value) {
                    Ok(lock) => lock.is_stale(now, threshold),
                    Err(e) => {
                        warn!("Removing unreadable lock record {}: {}", key, e);
                        true
                    }
                }
            })
            .await?;

        if removed > 0 {
            info!("Swept {} stale {} locks", removed, namespace);
            metrics::counter!("locks_swept_total", "namespace" => namespace.to_string())
                .increment(removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "lock_registry_test.rs"]
mod tests;
