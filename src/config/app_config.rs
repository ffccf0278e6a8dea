//! 启动时从环境变量冻结下来的配置

use chrono::Duration;

use super::parameter::{
    self, DEFAULT_EXERCISE_RESET_CRON, DEFAULT_TOKEN_EXPIRES_IN,
    DEFAULT_VERIFICATION_CODE_TTL_SECS,
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub master_db_url: String,
    pub slave_db_url: String,
    /// 没有配置时使用空缓存
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub token_validity: Duration,
    pub verification_code_ttl: Duration,
    /// 为空时不启动进程内的定时任务
    pub exercise_reset_cron: String,
    pub cron_secret: Option<String>,
    /// 信任上游注入的 x-user-id / x-user-role
    pub trust_upstream_headers: bool,
    pub development: bool,
    pub log_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let code_ttl = parameter::get_or(
            "VERIFICATION_CODE_TTL_SECS",
            &DEFAULT_VERIFICATION_CODE_TTL_SECS.to_string(),
        )
        .parse::<i64>()
        .unwrap_or(DEFAULT_VERIFICATION_CODE_TTL_SECS);

        Self {
            port: parameter::get_or("PORT", "3000").parse().unwrap_or(3000),
            master_db_url: parameter::get("MASTER_DB_URL"),
            slave_db_url: parameter::get("SLAVE_DB_URL"),
            redis_url: parameter::get_opt("REDIS_URL"),
            jwt_secret: parameter::get("JWT_SECRET"),
            token_validity: parse_expires_in(&parameter::get_or(
                "JWT_EXPIRES_IN",
                DEFAULT_TOKEN_EXPIRES_IN,
            )),
            verification_code_ttl: Duration::seconds(code_ttl),
            // 设置为空串时关闭定时重置
            exercise_reset_cron: parameter::get_or_keep_empty(
                "EXERCISE_RESET_CRON",
                DEFAULT_EXERCISE_RESET_CRON,
            ),
            cron_secret: parameter::get_opt("CRON_SECRET"),
            trust_upstream_headers: parse_bool(&parameter::get_or(
                "TRUST_UPSTREAM_HEADERS",
                "false",
            )),
            development: parameter::get_or("APP_ENV", "production") == "development",
            log_dir: parameter::get_or("LOG_DIR", "log"),
        }
    }
}

/// 解析 `7d` / `12h` / `30m` / `45s` / `3600` 这类有效期，无法识别时按 7 天处理
pub fn parse_expires_in(raw: &str) -> Duration {
    let fallback = Duration::days(7);
    let raw = raw.trim();
    if raw.is_empty() {
        return fallback;
    }
    let (number, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], Some(c)),
        _ => (raw, None),
    };
    let value = match number.trim().parse::<i64>() {
        Ok(value) if value > 0 => value,
        _ => return fallback,
    };
    match unit {
        Some('d') => Duration::days(value),
        Some('h') => Duration::hours(value),
        Some('m') => Duration::minutes(value),
        Some('s') | None => Duration::seconds(value),
        Some(_) => fallback,
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
