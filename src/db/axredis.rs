use deadpool_redis::{Config, Pool, Runtime};

/// 创建 redis 连接池并做一次连接测试，失败时返回 None，由调用方退化为空缓存
pub async fn init_redis_pool(redis_url: Option<&str>) -> Option<Pool> {
    let redis_url = match redis_url {
        Some(url) => url,
        None => {
            tracing::warn!("REDIS_URL is not set, token cache disabled");
            return None;
        }
    };

    let mut cfg = Config::from_url(redis_url);
    if let Some(pool_cfg) = cfg.pool.as_mut() {
        pool_cfg.max_size = 10;
    }
    let pool = match cfg.create_pool(Some(Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!("redis pool create failed, cache disabled, error:{}", err);
            return None;
        }
    };
    // 创建好连接池进行获取连接测试
    if let Err(err) = pool.get().await {
        tracing::error!("redis connect failed, cache disabled, error:{}", err);
        return None;
    }
    Some(pool)
}
