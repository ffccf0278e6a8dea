use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("sms provider rejected the request: {0}")]
    Rejected(String),
}

/// 短信通道，只负责把验证码发出去
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsSenderTrait: Send + Sync {
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), SmsError>;
}

/// 未接入短信服务商时使用，只写日志
#[derive(Clone, Debug, Default)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSenderTrait for LogSmsSender {
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), SmsError> {
        let masked = match phone.get(7..) {
            Some(tail) => format!("*******{tail}"),
            None => "***".to_string(),
        };
        tracing::info!("send_code - phone:{}", masked);
        tracing::debug!("send_code - phone:{} | code:{}", masked, code);
        Ok(())
    }
}
