use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::principal::models::DeviceId;
use crate::settings::errors::SettingsError;
use crate::settings::models::RateChange;
use crate::settings::ports::SettingsRepository;
use crate::settings::ports::SettingsServicePort;

/// Domain service for tariff settings.
pub struct SettingsService<SR>
where
    SR: SettingsRepository,
{
    repository: Arc<SR>,
}

impl<SR> SettingsService<SR>
where
    SR: SettingsRepository,
{
    pub fn new(repository: Arc<SR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<SR> SettingsServicePort for SettingsService<SR>
where
    SR: SettingsRepository,
{
    async fn update_rate(
        &self,
        device_id: DeviceId,
        new_rate: f64,
    ) -> Result<RateChange, SettingsError> {
        let changed_at = Utc::now();

        self.repository
            .rotate_rate(&device_id, new_rate, changed_at)
            .await?;

        tracing::info!(device_id = %device_id, new_rate, "Tariff rate updated");

        Ok(RateChange {
            device_id,
            new_rate,
            start_time: changed_at,
        })
    }
}
