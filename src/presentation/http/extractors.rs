//! Custom Extractors
//!
//! Axum extractors for caller identity.
//!
//! Authentication is a pre-authenticated opaque user id in the `X-User-Id`
//! header; credential verification happens only at login. Session/token
//! issuance is an external concern.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::shared::error::AppError;

/// Header carrying the caller's pre-authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller extracted from the `X-User-Id` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("User ID required".into()))?;

        let user_id = header
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| AppError::Unauthorized("Invalid user ID header".into()))?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let result = extract(None).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_non_numeric_header_is_unauthorized() {
        let result = extract(Some("not-a-number")).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_valid_header_yields_user_id() {
        let auth = extract(Some("42")).await.expect("extraction failed");
        assert_eq!(auth.user_id, 42);
    }
}
