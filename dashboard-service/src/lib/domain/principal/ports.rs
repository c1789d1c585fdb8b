use async_trait::async_trait;

use crate::principal::errors::AuthError;
use crate::principal::models::Admin;
use crate::principal::models::ChangePasswordCommand;
use crate::principal::models::CreateAdminCommand;
use crate::principal::models::CreateDeviceCommand;
use crate::principal::models::Device;
use crate::principal::models::DeviceId;
use crate::principal::models::LoginOutcome;
use crate::principal::models::Principal;
use crate::principal::models::PrincipalKind;
use crate::principal::models::ProvisionedDevice;
use crate::principal::models::Username;

/// Port for authentication and account-lifecycle operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a bearer token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong secret; callers
    ///   cannot tell the two apart
    async fn login(
        &self,
        identifier: &str,
        password: &str,
        claimed_kind: PrincipalKind,
    ) -> Result<LoginOutcome, AuthError>;

    /// Resolve a presented token to a live principal.
    ///
    /// The backing record is re-fetched on every call; the store, not the
    /// token, is authoritative for current state.
    ///
    /// # Errors
    /// * `Unauthorized` - Invalid/expired token, or the record is gone
    async fn resolve_token(&self, token: &str) -> Result<Principal, AuthError>;

    /// Rotate the principal's own password. Devices clear their
    /// `force_password_change` flag on success.
    ///
    /// # Errors
    /// * `InvalidCurrentPassword` - Current secret does not match; the
    ///   stored hash is left untouched
    async fn change_password(
        &self,
        principal: &Principal,
        command: ChangePasswordCommand,
    ) -> Result<(), AuthError>;

    /// Provision a new device with a forced password change.
    ///
    /// # Errors
    /// * `DeviceNameExists` - Name is already taken
    async fn create_device(
        &self,
        command: CreateDeviceCommand,
    ) -> Result<ProvisionedDevice, AuthError>;

    /// List all devices, newest first.
    async fn list_devices(&self) -> Result<Vec<Device>, AuthError>;

    /// Delete a device.
    ///
    /// # Errors
    /// * `DeviceNotFound` - No such device
    async fn delete_device(&self, id: &DeviceId) -> Result<(), AuthError>;

    /// Regenerate a device's temporary password and re-force rotation.
    ///
    /// # Errors
    /// * `DeviceNotFound` - No such device
    async fn reset_device_password(&self, id: &DeviceId) -> Result<ProvisionedDevice, AuthError>;

    /// Create the first administrator. Permitted only while zero admin
    /// accounts exist; self-disables permanently afterwards.
    ///
    /// # Errors
    /// * `AdminBootstrapClosed` - An admin already exists
    async fn create_first_admin(&self, command: CreateAdminCommand) -> Result<Admin, AuthError>;
}

/// Persistence operations for administrator accounts.
#[async_trait]
pub trait AdminRepository: Send + Sync + 'static {
    async fn find_by_id(&self, admin_id: i32) -> Result<Option<Admin>, AuthError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, AuthError>;

    /// Number of admin accounts; gates the bootstrap endpoint.
    async fn count(&self) -> Result<i64, AuthError>;

    /// Persist a new admin and return it with its assigned id.
    ///
    /// # Errors
    /// * `UsernameExists` - Username is already taken
    async fn create(&self, username: &Username, password_hash: &str) -> Result<Admin, AuthError>;

    /// Replace the stored hash.
    ///
    /// # Errors
    /// * `AdminNotFound` - No such admin
    async fn update_password_hash(&self, admin_id: i32, password_hash: &str)
        -> Result<(), AuthError>;
}

/// Persistence operations for device accounts.
#[async_trait]
pub trait DeviceRepository: Send + Sync + 'static {
    async fn find_by_id(&self, id: &DeviceId) -> Result<Option<Device>, AuthError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Device>, AuthError>;

    /// All devices, newest first.
    async fn list_all(&self) -> Result<Vec<Device>, AuthError>;

    /// Persist a new device.
    ///
    /// # Errors
    /// * `DeviceNameExists` - Name is already taken
    async fn create(&self, device: Device) -> Result<Device, AuthError>;

    /// Remove a device.
    ///
    /// # Errors
    /// * `DeviceNotFound` - No such device
    async fn delete(&self, id: &DeviceId) -> Result<(), AuthError>;

    /// Replace the stored hash and set the rotation flag in one statement.
    ///
    /// # Errors
    /// * `DeviceNotFound` - No such device
    async fn update_password_hash(
        &self,
        id: &DeviceId,
        password_hash: &str,
        force_password_change: bool,
    ) -> Result<(), AuthError>;
}
