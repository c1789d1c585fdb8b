use chrono::DateTime;
use chrono::Utc;

use crate::principal::models::DeviceId;

/// Outcome of a tariff-rate change: the new open-ended rate row.
#[derive(Debug, Clone, PartialEq)]
pub struct RateChange {
    pub device_id: DeviceId,
    pub new_rate: f64,
    pub start_time: DateTime<Utc>,
}
