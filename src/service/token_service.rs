use crate::db::cache::{generate_cache_key, CacheTrait};
use crate::error::api_error::ApiError;
use crate::error::db_error::DbError;
use crate::error::token_error::TokenError;
use crate::repository::token_repository::TokenRepositoryTrait;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const TOKEN_CACHE_PREFIX: &str = "token";
const USER_TOKEN_CACHE_PREFIX: &str = "user:token";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: i64,
    #[serde(rename = "permissionCode")]
    pub permission_code: String,
    pub iat: i64,
    pub exp: i64,
    /// 同一秒内签发的 token 也互不相同
    pub jti: String,
}

fn token_cache_key(token: &str) -> String {
    generate_cache_key(TOKEN_CACHE_PREFIX, token)
}

fn user_token_cache_key(user_id: i64) -> String {
    generate_cache_key(USER_TOKEN_CACHE_PREFIX, &user_id.to_string())
}

/// 签发、持久化、校验和吊销 token
///
/// 数据库里的 token 记录是唯一可信来源，缓存只是加速，缓存读写失败
/// 只记录日志，不影响结果。
#[derive(Clone)]
pub struct TokenService {
    token_repo: Arc<dyn TokenRepositoryTrait>,
    cache: Arc<dyn CacheTrait>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl TokenService {
    pub fn new(
        token_repo: Arc<dyn TokenRepositoryTrait>,
        cache: Arc<dyn CacheTrait>,
        secret: &str,
        validity: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            token_repo,
            cache,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity,
        }
    }

    /// 只签名，不写库
    pub fn issue_token(&self, user_id: i64, permission_code: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id,
            permission_code: permission_code.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| TokenError::TokenCreationError(err.to_string()))
    }

    /// 写入 token 记录并替换该用户之前的 token，旧 token 的缓存同时失效
    pub async fn persist_token(&self, token: &str, user_id: i64) -> Result<(), ApiError> {
        let claims = self.decode(token)?;
        let now = Utc::now();
        let previous = self
            .token_repo
            .upsert_token(user_id, token, now + self.validity, now)
            .await
            .map_err(|err| {
                tracing::error!("persist_token - user_id:{} | err:{}", user_id, err);
                DbError::from(err)
            })?;

        let user_key = user_token_cache_key(user_id);
        let cached = self.cache_get(&user_key).await;
        for stale in [previous, cached].into_iter().flatten() {
            if stale != token {
                self.cache_delete(&token_cache_key(&stale)).await;
            }
        }
        self.cache_claims(token, &claims, self.validity.num_seconds())
            .await;
        self.cache_set(&user_key, token, self.validity.num_seconds())
            .await;
        tracing::debug!("persist_token - user_id:{}", user_id);
        Ok(())
    }

    pub async fn issue_and_persist(
        &self,
        user_id: i64,
        permission_code: &str,
    ) -> Result<String, ApiError> {
        let token = self.issue_token(user_id, permission_code)?;
        self.persist_token(&token, user_id).await?;
        Ok(token)
    }

    /// 缓存命中直接返回缓存的 claims；否则校验签名和过期时间，
    /// 再确认数据库里有未过期的记录，最后回填缓存
    pub async fn validate(&self, token: &str) -> Result<TokenClaims, ApiError> {
        let token_key = token_cache_key(token);
        if let Some(payload) = self.cache_get(&token_key).await {
            match serde_json::from_str::<TokenClaims>(&payload) {
                Ok(claims) => return Ok(claims),
                Err(err) => {
                    tracing::warn!("validate - bad cached payload, err:{}", err);
                    self.cache_delete(&token_key).await;
                }
            }
        }

        let claims = self.decode(token)?;
        let record = self
            .token_repo
            .find_token(token)
            .await
            .map_err(|err| {
                tracing::error!("validate - find_token err:{}", err);
                DbError::from(err)
            })?
            .ok_or(TokenError::TokenRevoked)?;

        let now = Utc::now();
        if record.expires <= now {
            return Err(TokenError::TokenExpired.into());
        }
        let remaining = (record.expires - now).min(self.validity).num_seconds();
        self.cache_claims(token, &claims, remaining).await;
        self.cache_set(&user_token_cache_key(record.user_id), token, remaining)
            .await;
        Ok(claims)
    }

    /// 删除用户的 token 记录和缓存。删库前后各清一次缓存，防止并发的
    /// validate 在删库前读到记录后又把缓存写回去
    pub async fn invalidate(&self, user_id: i64) -> Result<(), ApiError> {
        let user_key = user_token_cache_key(user_id);
        let mut tokens = Vec::new();
        if let Some(cached) = self.cache_get(&user_key).await {
            tokens.push(cached);
        }
        let stored = self
            .token_repo
            .find_token_by_user(user_id)
            .await
            .map_err(|err| {
                tracing::error!("invalidate - user_id:{} | err:{}", user_id, err);
                DbError::from(err)
            })?;
        if let Some(record) = stored {
            if !tokens.contains(&record.token) {
                tokens.push(record.token);
            }
        }

        self.evict(&user_key, &tokens).await;
        let deleted = self
            .token_repo
            .delete_tokens_by_user(user_id)
            .await
            .map_err(|err| {
                tracing::error!("invalidate - user_id:{} | err:{}", user_id, err);
                DbError::from(err)
            })?;
        self.evict(&user_key, &tokens).await;
        tracing::debug!("invalidate - user_id:{} | deleted:{}", user_id, deleted);
        Ok(())
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidToken(err.to_string()),
            })
    }

    async fn evict(&self, user_key: &str, tokens: &[String]) {
        for token in tokens {
            self.cache_delete(&token_cache_key(token)).await;
        }
        self.cache_delete(user_key).await;
    }

    async fn cache_claims(&self, token: &str, claims: &TokenClaims, ttl_seconds: i64) {
        match serde_json::to_string(claims) {
            Ok(payload) => {
                self.cache_set(&token_cache_key(token), &payload, ttl_seconds)
                    .await
            }
            Err(err) => tracing::warn!("cache_claims - serialize err:{}", err),
        }
    }

    async fn cache_get(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("cache get failed, key:{} | err:{}", key, err);
                None
            }
        }
    }

    async fn cache_set(&self, key: &str, value: &str, ttl_seconds: i64) {
        if ttl_seconds <= 0 {
            return;
        }
        if let Err(err) = self.cache.set(key, value, ttl_seconds as u64).await {
            tracing::warn!("cache set failed, key:{} | err:{}", key, err);
        }
    }

    async fn cache_delete(&self, key: &str) {
        if let Err(err) = self.cache.delete(key).await {
            tracing::warn!("cache delete failed, key:{} | err:{}", key, err);
        }
    }
}
