use thiserror::Error;

/// Error for DeviceId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceIdError {
    #[error("Invalid device ID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for DeviceName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceNameError {
    #[error("Device name must not be empty")]
    Empty,

    #[error("Device name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for authentication and provisioning operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Login failures collapse to one uniform variant: callers cannot tell
    // an unknown identifier from a wrong secret
    #[error("Incorrect username or password")]
    InvalidCredentials,

    // No token, a bad token, or a token whose backing record is gone
    #[error("Could not validate credentials")]
    Unauthorized,

    // Identity is known, privilege is insufficient
    #[error("Not enough permissions")]
    Forbidden,

    #[error("Access denied to this device data")]
    DeviceScopeDenied,

    #[error("device_id is required for admin users")]
    MissingDeviceId,

    #[error("Admin accounts can only be created by existing admins")]
    AdminBootstrapClosed,

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    // Value object validation errors
    #[error(transparent)]
    InvalidDeviceId(#[from] DeviceIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid device name: {0}")]
    InvalidDeviceName(#[from] DeviceNameError),

    // Domain-level errors
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Admin not found: {0}")]
    AdminNotFound(String),

    #[error("Device name already exists: {0}")]
    DeviceNameExists(String),

    #[error("Username already exists: {0}")]
    UsernameExists(String),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
