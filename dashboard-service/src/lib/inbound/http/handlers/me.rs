use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::principal::models::Principal;

pub async fn me(
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&principal).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub username: String,
    pub user_type: String,

    /// Only devices carry a rotation flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_password_change: Option<bool>,
}

impl From<&Principal> for MeResponseData {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.subject(),
            username: principal.display_name().to_string(),
            user_type: principal.kind().to_string(),
            force_password_change: match principal {
                Principal::Admin(_) => None,
                Principal::Device(device) => Some(device.force_password_change),
            },
        }
    }
}
