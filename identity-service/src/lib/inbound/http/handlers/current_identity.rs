use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::Role;
use crate::inbound::http::middleware::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

pub async fn current_identity(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<CurrentIdentityResponseData>, ApiError> {
    let profile = state
        .auth_service
        .current_identity(&authenticated.session)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        CurrentIdentityResponseData {
            user: (&profile).into(),
            role: authenticated.session.role,
        },
    ))
}

/// Role is the one asserted by the token, which may predate a role change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentIdentityResponseData {
    pub user: IdentityData,
    pub role: Role,
}
