use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;
use crate::principal::scope::resolve_device_scope;
use crate::settings::models::RateChange;
use crate::settings::ports::SettingsServicePort;

pub async fn update_rate(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Json(body): Json<UpdateRateRequestBody>,
) -> Result<ApiSuccess<UpdateRateResponseData>, ApiError> {
    let device_id = resolve_device_scope(body.device_id.as_deref(), &principal)
        .map_err(ApiError::from)?;

    state
        .settings_service
        .update_rate(device_id, body.new_rate)
        .await
        .map_err(ApiError::from)
        .map(|ref change| ApiSuccess::new(StatusCode::OK, change.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateRateRequestBody {
    device_id: Option<String>,
    new_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRateResponseData {
    pub message: String,
    pub new_rate: f64,
    pub device_id: String,
    pub start_time: DateTime<Utc>,
}

impl From<&RateChange> for UpdateRateResponseData {
    fn from(change: &RateChange) -> Self {
        Self {
            message: "Rate updated successfully".to_string(),
            new_rate: change.new_rate,
            device_id: change.device_id.to_string(),
            start_time: change.start_time,
        }
    }
}
