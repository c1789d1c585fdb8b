use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::principal::models::DeviceId;
use crate::settings::errors::SettingsError;
use crate::settings::models::RateChange;

/// Port for tariff-settings operations.
#[async_trait]
pub trait SettingsServicePort: Send + Sync + 'static {
    /// Replace the device's open tariff rate with a new one.
    ///
    /// # Errors
    /// * `DeviceNotFound` - No such device
    async fn update_rate(
        &self,
        device_id: DeviceId,
        new_rate: f64,
    ) -> Result<RateChange, SettingsError>;
}

/// Persistence operations for tariff-rate rows.
#[async_trait]
pub trait SettingsRepository: Send + Sync + 'static {
    /// Close the device's open rate row at `changed_at` and insert a new
    /// open-ended one, atomically. At no point may a reader observe zero
    /// or two open rows for the device, concurrent rotations included.
    ///
    /// # Errors
    /// * `DeviceNotFound` - No such device
    async fn rotate_rate(
        &self,
        device_id: &DeviceId,
        new_rate: f64,
        changed_at: DateTime<Utc>,
    ) -> Result<(), SettingsError>;
}
