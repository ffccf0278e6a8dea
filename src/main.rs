use crate::config::parameter;
use crate::db::cache::{CacheTrait, NoopCache, RedisCache};
use crate::db::{
    axredis,
    database::{self, DatabaseTrait},
};
use crate::repository::Repositories;
use crate::service::cron_service::CronService;
use crate::service::sms_service::LogSmsSender;
use crate::state::AppServices;

use tokio_cron_scheduler::JobScheduler;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::Arc;

mod config;
mod db;
mod dto;
mod error;
mod handler;
mod middleware;
mod model;
mod repository;
mod response;
mod routes;
mod service;
mod state;
#[cfg(test)]
mod test_support;
mod utils;

// 内存分配器
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[cfg(target_env = "msvc")]
use mimalloc::MiMalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    // 参数初始化
    parameter::init();
    let config = parameter::config();

    // 日志
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("logger")
        .filename_suffix("log")
        .max_log_files(60)
        .build(&config.log_dir)
        .expect("file log init failed!");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let file_log_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_timer(time::LocalTime::rfc_3339());

    let console_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_timer(time::LocalTime::rfc_3339());
    tracing_subscriber::registry()
        .with(file_log_subscriber)
        .with(console_subscriber)
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let connection = database::Database::init(config)
        .await
        .unwrap_or_else(|e| panic!("Database error: {}", e));
    let mysql_pool = Arc::new(connection);
    if parameter::has_flag("--migrate") {
        mysql_pool
            .run_migrations()
            .await
            .unwrap_or_else(|e| panic!("Migration error: {}", e));
        tracing::info!("migrations applied");
    }

    // redis 不可用时退化为空缓存，token 校验直接查库
    let cache: Arc<dyn CacheTrait> = match axredis::init_redis_pool(config.redis_url.as_deref()).await
    {
        Some(pool) => Arc::new(RedisCache::new(&pool)),
        None => Arc::new(NoopCache),
    };

    let services = AppServices::new(
        Repositories::mysql(&mysql_pool),
        cache,
        Arc::new(LogSmsSender),
        config,
    );

    let sched = JobScheduler::new()
        .await
        .unwrap_or_else(|e| panic!("Scheduler error: {}", e));
    let cron_service = CronService::new(&sched, &services.exercise_service);
    cron_service
        .start_exercise_reset_job(&config.exercise_reset_cron)
        .await
        .unwrap_or_else(|e| panic!("Server error : exercise reset job init failed, {}", e));

    let host = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(host)
        .await
        .unwrap_or_else(|e| panic!("Bind error: {}", e));

    tracing::info!(
        "listening on {:?} | development: {} | trust_upstream_headers: {}",
        listener.local_addr(),
        config.development,
        config.trust_upstream_headers
    );

    axum::serve(listener, routes::root::routes(&services))
        .await
        .unwrap_or_else(|e| panic!("Server error: {}", e));
}
