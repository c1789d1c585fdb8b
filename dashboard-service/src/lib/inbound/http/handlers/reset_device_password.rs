use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;
use crate::principal::models::DeviceId;
use crate::principal::models::ProvisionedDevice;
use crate::principal::ports::AuthServicePort;

pub async fn reset_device_password(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(device_id): Path<String>,
) -> Result<ApiSuccess<ResetDevicePasswordResponseData>, ApiError> {
    principal.require_admin().map_err(ApiError::from)?;

    let device_id =
        DeviceId::from_string(&device_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .auth_service
        .reset_device_password(&device_id)
        .await
        .map_err(ApiError::from)
        .map(|ref provisioned| ApiSuccess::new(StatusCode::OK, provisioned.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetDevicePasswordResponseData {
    pub device_id: String,
    pub device_name: String,
    pub temp_password: String,
}

impl From<&ProvisionedDevice> for ResetDevicePasswordResponseData {
    fn from(provisioned: &ProvisionedDevice) -> Self {
        Self {
            device_id: provisioned.device.device_id.to_string(),
            device_name: provisioned.device.device_name.to_string(),
            temp_password: provisioned.temp_password.clone(),
        }
    }
}
