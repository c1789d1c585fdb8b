use thiserror::Error;

/// Error for tariff-settings operations
#[derive(Debug, Clone, Error)]
pub enum SettingsError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
