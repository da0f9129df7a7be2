// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::kv_store::{KeyPredicate, KeyValueStore, StoreError};
use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

/// Redis客户端
///
/// 多实例部署时的共享键值存储
#[derive(Clone)]
pub struct RedisClient {
    /// Redis客户端
    client: redis::Client,
}

impl RedisClient {
    /// 创建新的Redis客户端实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisClient)` - Redis客户端实例
    /// * `Err(StoreError)` - URL 无法解析
    pub fn new(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// 检查 Redis 是否可达
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        redis::cmd("PING").query_async::<String>(&mut con).await?;
        Ok(())
    }
}

/// 值未变化时才删除
const DELETE_IF_EQUALS: &str = r#"
    if redis.call("GET", KEYS[1]) == ARGV[1] then
        return redis.call("DEL", KEYS[1])
    end
    return 0
"#;

const SCAN_BATCH: usize = 100;

/// Redis 过期时间最小粒度为 1 秒
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl KeyValueStore for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.connection().await?;
        let value: Option<String> = con.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        match ttl {
            Some(ttl) => {
                con.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
                    .await?
            }
            None => con.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX");
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(ttl_seconds(ttl));
        }
        // SET NX 未写入时返回 nil
        let reply: Option<String> = cmd.query_async(&mut con).await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        let removed: i64 = con.del(key).await?;
        Ok(removed > 0)
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        let removed: i64 = redis::Script::new(DELETE_IF_EQUALS)
            .key(key)
            .arg(expected)
            .invoke_async(&mut con)
            .await?;
        Ok(removed > 0)
    }

    async fn delete_matching(
        &self,
        prefix: &str,
        predicate: KeyPredicate<'_>,
    ) -> Result<u64, StoreError> {
        let mut con = self.connection().await?;
        let pattern = format!("{}*", prefix);

        // SCAN 分批遍历，不阻塞服务端
        let mut keys = Vec::new();
        let mut cursor = 0u64;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut con)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        keys.sort();
        keys.dedup();

        let mut removed = 0u64;
        for key in keys {
            let value: Option<String> = con.get(&key).await?;
            let Some(value) = value else {
                continue;
            };
            if !predicate(key.as_str(), value.as_str()) {
                continue;
            }
            // 判定之后被改写的键保留
            if self.delete_if_equals(&key, &value).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
