use crate::error::{api_error::ApiError, token_error::TokenError, user_error::UserError};
use crate::model::user::{ROLE_ADMIN, ROLE_USER};
use crate::state::token_state::TokenState;
use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{request::Parts, HeaderMap};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// 通过认证的调用方，由 [`auth`] 放进 request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| TokenError::MissingToken.into())
    }
}

// 上游网关注入的身份
fn upstream_user(headers: &HeaderMap) -> Option<CurrentUser> {
    let user_id = headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| ROLE_USER.to_string());
    Some(CurrentUser { user_id, role })
}

// middleware
pub async fn auth(
    State(state): State<TokenState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let current_user = match bearer {
        Some(TypedHeader(authorization)) => {
            let claims = state.token_service.validate(authorization.token()).await?;
            CurrentUser {
                user_id: claims.sub,
                role: claims.permission_code,
            }
        }
        None if state.trust_upstream_headers => {
            upstream_user(req.headers()).ok_or(TokenError::MissingToken)?
        }
        None => return Err(TokenError::MissingToken.into()),
    };
    tracing::debug!(
        "auth - user_id:{} | role:{} | uri:{}",
        current_user.user_id,
        current_user.role,
        req.uri()
    );
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// 必须在 [`auth`] 之后执行
pub async fn require_admin(
    current_user: CurrentUser,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if !current_user.is_admin() {
        tracing::warn!("require_admin - denied user_id:{}", current_user.user_id);
        return Err(UserError::PermissionDenied.into());
    }
    Ok(next.run(req).await)
}
