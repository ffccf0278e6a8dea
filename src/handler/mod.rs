pub mod auth_handler;
pub mod cron_handler;
pub mod diet_handler;
pub mod food_handler;
pub mod play_record_handler;
pub mod register_handler;
pub mod user_handler;
pub mod video_handler;

use crate::error::{api_error::ApiError, diet_error::DietError};
use crate::utils::date;
use chrono::NaiveDate;

/// 可选的日期参数，格式不对返回 400
pub(crate) fn parse_date_param(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => date::parse_date(raw)
            .map(Some)
            .ok_or_else(|| DietError::InvalidDate(raw.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_params() {
        assert_eq!(parse_date_param(None).unwrap(), None);
        assert_eq!(parse_date_param(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_date_param(Some("2024-05-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert!(parse_date_param(Some("May 1st")).is_err());
    }
}
