//! 可选的 key-value 缓存
//!
//! 缓存只保存可以随时丢弃并从数据库重建的数据。redis 不可用时使用
//! [`NoopCache`]，调用方不能依赖缓存的存在来保证正确性。

use async_trait::async_trait;
use deadpool_redis::{Pool, PoolError};
use redis::RedisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("cache command error: {0}")]
    Command(#[from] RedisError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheTrait: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// `ttl_seconds` 为 0 时不写入
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// 生成缓存 key，格式 `prefix:identifier`
pub fn generate_cache_key(prefix: &str, identifier: &str) -> String {
    format!("{prefix}:{identifier}")
}

#[derive(Clone)]
pub struct RedisCache {
    redis_con_pool: Pool,
}

impl RedisCache {
    pub fn new(redis_con_pool: &Pool) -> Self {
        Self {
            redis_con_pool: redis_con_pool.clone(),
        }
    }
}

#[async_trait]
impl CacheTrait for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut con = self.redis_con_pool.get().await?;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut con).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        if ttl_seconds == 0 {
            return Ok(());
        }
        let mut con = self.redis_con_pool.get().await?;
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<_, ()>(&mut con)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut con = self.redis_con_pool.get().await?;
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, ()>(&mut con)
            .await?;
        Ok(())
    }
}

/// redis 未配置或连接失败时使用，所有读取都是未命中
#[derive(Clone, Debug, Default)]
pub struct NoopCache;

#[async_trait]
impl CacheTrait for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: u64) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}
