//! Role-tagged request context.
//!
//! Every handler receives the caller's role explicitly through
//! [`RequestContext`]. It is read from the `x-user-role` and optional
//! `x-user-id` headers on each request.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::response::{ApiError, ApiErrorResponse};

/// Header carrying the caller's role.
pub const ROLE_HEADER: &str = "x-user-role";

/// Header carrying the caller's user ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A worker recording their own attendance.
    Worker,
    /// A manager with access to the dashboard and administration.
    Manager,
}

impl Role {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "worker" => Some(Role::Worker),
            "manager" => Some(Role::Manager),
            _ => None,
        }
    }
}

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// The caller's role.
    pub role: Role,
    /// The caller's user ID, when supplied.
    pub user_id: Option<String>,
}

impl RequestContext {
    /// Fails with [`EngineError::Forbidden`] unless the caller is a manager.
    pub fn require_manager(&self) -> EngineResult<()> {
        match self.role {
            Role::Manager => Ok(()),
            Role::Worker => Err(EngineError::Forbidden {
                message: "manager role required".to_string(),
            }),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiErrorResponse::new(
                    StatusCode::BAD_REQUEST,
                    ApiError::new("MISSING_ROLE", format!("The {} header is required", ROLE_HEADER)),
                )
            })?;

        let role = Role::parse(raw_role).ok_or_else(|| {
            ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_ROLE",
                    format!("Unknown role: {}", raw_role),
                    "Expected 'worker' or 'manager'",
                ),
            )
        })?;

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Ok(RequestContext { role, user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(headers: &[(&str, &str)]) -> Result<RequestContext, ApiErrorResponse> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        RequestContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_manager_context() {
        let context = extract(&[(ROLE_HEADER, "Manager"), (USER_ID_HEADER, "boss")])
            .await
            .unwrap();
        assert_eq!(context.role, Role::Manager);
        assert_eq!(context.user_id.as_deref(), Some("boss"));
        assert!(context.require_manager().is_ok());
    }

    #[tokio::test]
    async fn test_worker_cannot_act_as_manager() {
        let context = extract(&[(ROLE_HEADER, "worker")]).await.unwrap();
        assert_eq!(context.user_id, None);
        assert!(matches!(
            context.require_manager(),
            Err(EngineError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_role_is_rejected() {
        let rejection = extract(&[]).await.unwrap_err();
        assert_eq!(rejection.status, StatusCode::BAD_REQUEST);
        assert_eq!(rejection.error.code, "MISSING_ROLE");
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let rejection = extract(&[(ROLE_HEADER, "admin")]).await.unwrap_err();
        assert_eq!(rejection.error.code, "INVALID_ROLE");
    }
}
