//! Bearer token extractors and the API error response.

use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};

use crate::{
    domain::{Role, Session},
    infrastructure::dto::http::ApiResponse,
    ui::state::AppState,
};

/// Error response rendered as the `{code, message, data: null}` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(self.status.as_u16(), self.message));
        if self.status == StatusCode::UNAUTHORIZED {
            (self.status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

/// Session of a logged-in user (`Authorization: Bearer <user token>`)
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Session);

/// Session of a logged-in admin (`Authorization: Bearer <admin token>`)
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub Session);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

async fn authenticate(
    parts: &Parts,
    state: &Arc<AppState>,
    role: Role,
) -> Result<Session, ApiError> {
    let token = bearer_token(&parts.headers)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    state
        .authenticate_usecase
        .execute(token, role)
        .await
        .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, Role::User).await.map(Self)
    }
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, Role::Admin).await.map(Self)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        // テスト項目: Bearer スキームのトークンが取り出される（大文字小文字は問わない）
        // given (前提条件):
        let upper = headers_with("Bearer abc");
        let lower = headers_with("bearer xyz");

        // when (操作):
        // then (期待する結果):
        assert_eq!(bearer_token(&upper), Some("abc"));
        assert_eq!(bearer_token(&lower), Some("xyz"));
    }

    #[test]
    fn test_other_schemes_are_rejected() {
        // テスト項目: Bearer 以外・トークン無し・ヘッダ無しは None
        // given (前提条件):
        let basic = headers_with("Basic dXNlcjpwYXNz");
        let empty = headers_with("Bearer ");

        // when (操作):
        // then (期待する結果):
        assert_eq!(bearer_token(&basic), None);
        assert_eq!(bearer_token(&empty), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_unauthorized_response_carries_challenge() {
        // テスト項目: 401 応答に WWW-Authenticate: Bearer が付く
        // given (前提条件):
        let error = ApiError::unauthorized("Not authenticated");

        // when (操作):
        let response = error.into_response();

        // then (期待する結果):
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_not_found_response_has_no_challenge() {
        // テスト項目: 401 以外の応答にはチャレンジヘッダが付かない
        // given (前提条件):
        let error = ApiError::not_found("Room not found");

        // when (操作):
        let response = error.into_response();

        // then (期待する結果):
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
