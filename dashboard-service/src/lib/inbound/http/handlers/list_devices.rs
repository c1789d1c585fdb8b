use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;
use crate::principal::models::Device;
use crate::principal::ports::AuthServicePort;

pub async fn list_devices(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
) -> Result<ApiSuccess<Vec<DeviceData>>, ApiError> {
    principal.require_admin().map_err(ApiError::from)?;

    let devices = state
        .auth_service
        .list_devices()
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        devices.iter().map(DeviceData::from).collect(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceData {
    pub device_id: String,
    pub device_name: String,
    pub created_at: DateTime<Utc>,
    pub force_password_change: bool,
}

impl From<&Device> for DeviceData {
    fn from(device: &Device) -> Self {
        Self {
            device_id: device.device_id.to_string(),
            device_name: device.device_name.to_string(),
            created_at: device.created_at,
            force_password_change: device.force_password_change,
        }
    }
}
