use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

pub use auth::PrincipalKind;

use crate::principal::errors::AuthError;
use crate::principal::errors::DeviceIdError;
use crate::principal::errors::DeviceNameError;
use crate::principal::errors::UsernameError;

/// Administrator account.
#[derive(Debug, Clone)]
pub struct Admin {
    pub admin_id: i32,
    pub username: Username,
    pub password_hash: String,
}

/// Metering device account.
#[derive(Debug, Clone)]
pub struct Device {
    pub device_id: DeviceId,
    pub device_name: DeviceName,
    pub password_hash: String,
    pub force_password_change: bool,
    pub created_at: DateTime<Utc>,
}

/// An authenticated actor.
///
/// Tagged by kind, so only the fields valid for that kind exist: there is
/// no such thing as an admin with a `force_password_change` flag.
#[derive(Debug, Clone)]
pub enum Principal {
    Admin(Admin),
    Device(Device),
}

impl Principal {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Admin(_) => PrincipalKind::Admin,
            Principal::Device(_) => PrincipalKind::Device,
        }
    }

    /// Identifier as carried in a token subject: admin id in decimal form,
    /// device UUID otherwise.
    pub fn subject(&self) -> String {
        match self {
            Principal::Admin(admin) => admin.admin_id.to_string(),
            Principal::Device(device) => device.device_id.to_string(),
        }
    }

    /// Human-readable name: admin username or device name.
    pub fn display_name(&self) -> &str {
        match self {
            Principal::Admin(admin) => admin.username.as_str(),
            Principal::Device(device) => device.device_name.as_str(),
        }
    }

    /// Live password-rotation flag; admins never carry one.
    pub fn force_password_change(&self) -> bool {
        match self {
            Principal::Admin(_) => false,
            Principal::Device(device) => device.force_password_change,
        }
    }

    /// Require administrator privilege.
    ///
    /// # Errors
    /// * `Forbidden` - The principal is a device
    pub fn require_admin(&self) -> Result<&Admin, AuthError> {
        match self {
            Principal::Admin(admin) => Ok(admin),
            Principal::Device(_) => Err(AuthError::Forbidden),
        }
    }
}

/// Device unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub Uuid);

impl DeviceId {
    /// Generate a new random device ID (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a device ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, DeviceIdError> {
        Uuid::parse_str(s)
            .map(DeviceId)
            .map_err(|e| DeviceIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Admin username value type
///
/// 3-32 characters, alphanumeric plus underscore and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Device name value type
///
/// Non-empty, at most 64 characters. Device names live in their own
/// namespace; they are never checked against admin usernames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceName(String);

impl DeviceName {
    const MAX_LENGTH: usize = 64;

    pub fn new(name: String) -> Result<Self, DeviceNameError> {
        if name.is_empty() {
            return Err(DeviceNameError::Empty);
        }
        if name.len() > Self::MAX_LENGTH {
            return Err(DeviceNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: name.len(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a device login identifier parses.
///
/// A device may present either its UUID or its name. The UUID form is
/// decided up front by parsing, not by catching a lookup failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Id(DeviceId),
    Name(String),
}

impl LoginIdentifier {
    pub fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(uuid) => LoginIdentifier::Id(DeviceId(uuid)),
            Err(_) => LoginIdentifier::Name(raw.to_string()),
        }
    }
}

/// Command to provision a device. When `password` is absent a temporary
/// one is generated and returned once.
#[derive(Debug)]
pub struct CreateDeviceCommand {
    pub device_name: DeviceName,
    pub password: Option<String>,
}

/// Command to create the bootstrap administrator.
#[derive(Debug)]
pub struct CreateAdminCommand {
    pub username: Username,
    pub password: String,
}

/// Command to rotate the authenticated principal's own password.
#[derive(Debug)]
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub access_token: String,
    pub principal: Principal,
}

/// A freshly provisioned (or password-reset) device with its one-time
/// temporary password.
#[derive(Debug)]
pub struct ProvisionedDevice {
    pub device: Device,
    pub temp_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_identifier_uuid_form() {
        let raw = "0f8f1f9e-8a84-4f0e-bb9a-1d07f7a3e1b2";
        match LoginIdentifier::parse(raw) {
            LoginIdentifier::Id(id) => assert_eq!(id.to_string(), raw),
            LoginIdentifier::Name(_) => panic!("UUID literal parsed as name"),
        }
    }

    #[test]
    fn test_login_identifier_name_form() {
        match LoginIdentifier::parse("kitchen-meter") {
            LoginIdentifier::Name(name) => assert_eq!(name, "kitchen-meter"),
            LoginIdentifier::Id(_) => panic!("name parsed as UUID"),
        }
    }

    #[test]
    fn test_username_rules() {
        assert!(Username::new("al".to_string()).is_err());
        assert!(Username::new("a".repeat(33)).is_err());
        assert!(Username::new("bad name".to_string()).is_err());
        assert!(Username::new("alice_01".to_string()).is_ok());
    }

    #[test]
    fn test_device_name_rules() {
        assert!(DeviceName::new(String::new()).is_err());
        assert!(DeviceName::new("x".repeat(65)).is_err());
        assert!(DeviceName::new("Kitchen Meter".to_string()).is_ok());
    }

    #[test]
    fn test_admin_principal_never_forces_password_change() {
        let principal = Principal::Admin(Admin {
            admin_id: 1,
            username: Username::new("root_admin".to_string()).unwrap(),
            password_hash: "$argon2id$test".to_string(),
        });

        assert!(!principal.force_password_change());
        assert_eq!(principal.subject(), "1");
        assert!(principal.require_admin().is_ok());
    }

    #[test]
    fn test_device_principal_requires_admin_fails() {
        let principal = Principal::Device(Device {
            device_id: DeviceId::new(),
            device_name: DeviceName::new("meter".to_string()).unwrap(),
            password_hash: "$argon2id$test".to_string(),
            force_password_change: true,
            created_at: Utc::now(),
        });

        assert!(principal.force_password_change());
        assert!(matches!(
            principal.require_admin(),
            Err(AuthError::Forbidden)
        ));
    }
}
