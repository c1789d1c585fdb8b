use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::principal::models::LoginOutcome;
use crate::principal::models::PrincipalKind;
use crate::principal::ports::AuthServicePort;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // Single-field forms select admin login with an "admin:" prefix;
    // structured forms use the is_admin flag
    let (identifier, kind) = match body.username.strip_prefix("admin:") {
        Some(rest) => (rest, PrincipalKind::Admin),
        None if body.is_admin => (body.username.as_str(), PrincipalKind::Admin),
        None => (body.username.as_str(), PrincipalKind::Device),
    };

    let outcome = state
        .auth_service
        .login(identifier, &body.password, kind)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::OK, (&outcome).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
    #[serde(default)]
    is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: String,
    pub user_type: String,
    pub user_id: String,
    pub force_password_change: bool,
}

impl From<&LoginOutcome> for LoginResponseData {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            access_token: outcome.access_token.clone(),
            token_type: "bearer".to_string(),
            user_type: outcome.principal.kind().to_string(),
            user_id: outcome.principal.subject(),
            force_password_change: outcome.principal.force_password_change(),
        }
    }
}
