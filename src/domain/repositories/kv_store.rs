// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 键值存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    /// 后端连接或命令错误
    #[error("Store backend error: {0}")]
    Backend(String),
    /// 存储内容无法解析
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// 键过滤谓词，用于批量删除
pub type KeyPredicate<'a> = &'a (dyn Fn(&str, &str) -> bool + Send + Sync);

/// 共享键值存储特质
///
/// 进度通道与锁注册表的唯一存储依赖。
/// 实现必须保证 `set_if_absent` 的原子性，多个实例共享同一存储时锁才有效。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 写入键，`ttl` 为 None 时永久保存
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// 仅当键不存在时写入，返回是否写入成功
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, StoreError>;

    /// 删除键，返回键是否存在
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// 仅当键的当前值等于 `expected` 时删除，比较与删除必须原子完成
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError>;

    /// 删除指定前缀下满足谓词的键
    ///
    /// 谓词参数为 (key, value)，返回删除的数量。
    /// 判定后值已被改写的键不会删除。
    async fn delete_matching(
        &self,
        prefix: &str,
        predicate: KeyPredicate<'_>,
    ) -> Result<u64, StoreError>;
}
