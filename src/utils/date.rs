use chrono::{DateTime, Local, NaiveDate};

/// 调用方本地时区的日期，"今天" 的边界是本地零点
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// 支持 `2024-05-01`、`2024/5/1` 和 RFC 3339 时间戳（按本地时区取日期）
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y/%m/%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.with_timezone(&Local).date_naive())
}
