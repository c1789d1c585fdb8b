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
use crate::principal::ports::AuthServicePort;

pub async fn delete_device(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(device_id): Path<String>,
) -> Result<ApiSuccess<DeleteDeviceResponseData>, ApiError> {
    principal.require_admin().map_err(ApiError::from)?;

    let device_id =
        DeviceId::from_string(&device_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .auth_service
        .delete_device(&device_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        DeleteDeviceResponseData {
            message: "Device deleted successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteDeviceResponseData {
    pub message: String,
}
