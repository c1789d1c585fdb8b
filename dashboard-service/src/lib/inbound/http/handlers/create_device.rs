use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;
use crate::principal::models::CreateDeviceCommand;
use crate::principal::models::DeviceName;
use crate::principal::models::ProvisionedDevice;
use crate::principal::ports::AuthServicePort;

pub async fn create_device(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Json(body): Json<CreateDeviceRequestBody>,
) -> Result<ApiSuccess<CreateDeviceResponseData>, ApiError> {
    principal.require_admin().map_err(ApiError::from)?;

    let device_name = DeviceName::new(body.device_name)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .auth_service
        .create_device(CreateDeviceCommand {
            device_name,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref provisioned| ApiSuccess::new(StatusCode::CREATED, provisioned.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateDeviceRequestBody {
    device_name: String,
    password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDeviceResponseData {
    pub device_id: String,
    pub device_name: String,
    pub temp_password: String,
}

impl From<&ProvisionedDevice> for CreateDeviceResponseData {
    fn from(provisioned: &ProvisionedDevice) -> Self {
        Self {
            device_id: provisioned.device.device_id.to_string(),
            device_name: provisioned.device.device_name.to_string(),
            temp_password: provisioned.temp_password.clone(),
        }
    }
}
