use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::principal::errors::UsernameError;
use crate::principal::models::Admin;
use crate::principal::models::CreateAdminCommand;
use crate::principal::models::Username;
use crate::principal::ports::AuthServicePort;

pub async fn create_admin(
    State(state): State<AppState>,
    Json(body): Json<CreateAdminRequestBody>,
) -> Result<ApiSuccess<CreateAdminResponseData>, ApiError> {
    state
        .auth_service
        .create_first_admin(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref admin| ApiSuccess::new(StatusCode::CREATED, admin.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAdminRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateAdminRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),
}

impl CreateAdminRequestBody {
    fn try_into_command(self) -> Result<CreateAdminCommand, ParseCreateAdminRequestError> {
        let username = Username::new(self.username)?;
        Ok(CreateAdminCommand {
            username,
            password: self.password,
        })
    }
}

impl From<ParseCreateAdminRequestError> for ApiError {
    fn from(err: ParseCreateAdminRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAdminResponseData {
    pub admin_id: i32,
    pub username: String,
}

impl From<&Admin> for CreateAdminResponseData {
    fn from(admin: &Admin) -> Self {
        Self {
            admin_id: admin.admin_id,
            username: admin.username.to_string(),
        }
    }
}
