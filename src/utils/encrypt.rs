use bcrypt::BcryptError;
use rand::Rng;

pub const PASSWORD_HASH_COST: u32 = 10;

// 计算密码哈希
pub fn hash_password(pwd: &str) -> Result<String, BcryptError> {
    bcrypt::hash(pwd, PASSWORD_HASH_COST)
}

// 验证密码，哈希格式错误也当作不匹配
pub fn verify_password(pwd: &str, hashed_pwd: &str) -> bool {
    match bcrypt::verify(pwd, hashed_pwd) {
        Ok(matched) => matched,
        Err(err) => {
            tracing::error!("verify_password - bcrypt error:{}", err);
            false
        }
    }
}

// 6位数字验证码
pub fn generate_verification_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
