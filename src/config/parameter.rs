use std::collections::HashSet;

use dotenv;
use once_cell::sync::OnceCell;

use super::app_config::AppConfig;

pub static CMD_ARGS: OnceCell<HashSet<String>> = OnceCell::new();
static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();

pub fn init() {
    // .env 可选，容器里一般直接用环境变量
    if let Err(err) = dotenv::dotenv() {
        eprintln!("config -- .env not loaded: {}", err);
    }
    // 给日志库设置环境变量
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "debug")
    }
    for required in ["MASTER_DB_URL", "JWT_SECRET"] {
        if std::env::var_os(required).is_none() {
            panic!("config -- env var `{}` is not exist ", required);
        }
    }
    // 没有配置从库时读写都走主库
    if std::env::var_os("SLAVE_DB_URL").is_none() {
        std::env::set_var("SLAVE_DB_URL", get("MASTER_DB_URL"));
    }
    assert!(CMD_ARGS.set(std::env::args().collect()).is_ok());
    assert!(APP_CONFIG.set(AppConfig::from_env()).is_ok());
}

pub fn get(parameter: &str) -> String {
    std::env::var(parameter)
        .unwrap_or_else(|_| panic!("{} is not defined in the environment.", parameter))
}

pub fn get_or(parameter: &str, default: &str) -> String {
    match std::env::var(parameter) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

/// 未设置时取默认值，显式设置为空串时保留空串（用来关闭某个功能）
pub fn get_or_keep_empty(parameter: &str, default: &str) -> String {
    std::env::var(parameter).unwrap_or_else(|_| default.to_string())
}

pub fn get_opt(parameter: &str) -> Option<String> {
    std::env::var(parameter)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// 启动参数里是否带了某个开关，例如 `--migrate`
pub fn has_flag(flag: &str) -> bool {
    CMD_ARGS
        .get()
        .map(|args| args.contains(flag))
        .unwrap_or(false)
}

pub fn config() -> &'static AppConfig {
    APP_CONFIG
        .get()
        .expect("parameter::init must run before the config is read")
}

// token 默认有效期 7 天
pub const DEFAULT_TOKEN_EXPIRES_IN: &str = "7d";
// 验证码默认有效期 10 分钟
pub const DEFAULT_VERIFICATION_CODE_TTL_SECS: i64 = 600;
// 每天本地零点重置今日运动时长
pub const DEFAULT_EXERCISE_RESET_CRON: &str = "0 0 0 * * *";
