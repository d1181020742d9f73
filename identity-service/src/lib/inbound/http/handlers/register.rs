use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Role;
use crate::identity::errors::IdentityError;
use crate::identity::errors::ValidationError;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let command = body.try_into_command().map_err(IdentityError::from)?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::CREATED, profile.into()))
}

/// HTTP request body for registration (raw JSON)
///
/// Absent fields deserialize as empty so they surface as field validation
/// errors rather than extractor rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    email: String,
    display_name: String,
    password: String,
    role: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ValidationError> {
        let email = EmailAddress::new(self.email)?;
        let display_name = DisplayName::new(self.display_name)?;
        let password = Password::new(self.password)?;
        let role = self.role.parse::<Role>()?;
        Ok(RegisterCommand::new(email, display_name, password, role))
    }
}
