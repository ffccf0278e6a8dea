use crate::config::app_config::AppConfig;
use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{Error, MySql, Pool};

pub struct Database {
    master_pool: Pool<MySql>,
    slave_pool: Pool<MySql>,
}

#[async_trait]
pub trait DatabaseTrait {
    async fn init(config: &AppConfig) -> Result<Self, Error>
    where
        Self: Sized;
    fn get_master_pool(&self) -> &Pool<MySql>;
    fn get_slave_pool(&self) -> &Pool<MySql>;
    async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError>;
}

#[async_trait]
impl DatabaseTrait for Database {
    async fn init(config: &AppConfig) -> Result<Self, Error> {
        let master_pool = MySqlPoolOptions::new()
            .max_connections(10)
            .max_lifetime(std::time::Duration::from_secs(6 * 60 * 60))
            .connect(&config.master_db_url)
            .await?;
        // 从库只给列表类查询用，token、计数等读写都走主库
        let slave_pool = if config.slave_db_url == config.master_db_url {
            master_pool.clone()
        } else {
            MySqlPoolOptions::new()
                .max_connections(10)
                .max_lifetime(std::time::Duration::from_secs(6 * 60 * 60))
                .connect(&config.slave_db_url)
                .await?
        };

        Ok(Self {
            master_pool,
            slave_pool,
        })
    }

    fn get_master_pool(&self) -> &Pool<MySql> {
        &self.master_pool
    }

    fn get_slave_pool(&self) -> &Pool<MySql> {
        &self.slave_pool
    }

    async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.master_pool).await
    }
}

/// mysql 唯一键冲突
pub fn is_duplicate_entry(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
