//! Role and tenant checks over request sessions.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::domain::roles::{Role, Session};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("role `{role}` is not permitted")]
    Forbidden { role: Role },
    #[error("tenant required")]
    TenantRequired,
}

impl AccessError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::TenantRequired => StatusCode::BAD_REQUEST,
        }
    }

    fn presentation_message(&self) -> &'static str {
        match self {
            Self::Forbidden { .. } => "Access denied",
            Self::TenantRequired => "Tenant required",
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        (self.status_code(), self.presentation_message()).into_response()
    }
}

/// Fails with [`AccessError::Forbidden`] unless the session role is listed in `allowed`.
pub fn assert_role(session: &Session, allowed: &[Role]) -> Result<(), AccessError> {
    if allowed.contains(&session.role) {
        Ok(())
    } else {
        Err(AccessError::Forbidden { role: session.role })
    }
}

/// Returns the session tenant, failing with [`AccessError::TenantRequired`] when absent or empty.
pub fn require_tenant(session: &Session) -> Result<&str, AccessError> {
    session.tenant().ok_or(AccessError::TenantRequired)
}

/// Whether the session role ranks at or above `minimum`.
pub fn can_act(session: &Session, minimum: Role) -> bool {
    session.role.at_least(minimum)
}
