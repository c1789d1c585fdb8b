use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::principal::errors::AuthError;
use crate::principal::models::Admin;
use crate::principal::models::ChangePasswordCommand;
use crate::principal::models::CreateAdminCommand;
use crate::principal::models::CreateDeviceCommand;
use crate::principal::models::Device;
use crate::principal::models::DeviceId;
use crate::principal::models::LoginIdentifier;
use crate::principal::models::LoginOutcome;
use crate::principal::models::Principal;
use crate::principal::models::PrincipalKind;
use crate::principal::models::ProvisionedDevice;
use crate::principal::ports::AdminRepository;
use crate::principal::ports::AuthServicePort;
use crate::principal::ports::DeviceRepository;

const TEMP_PASSWORD_LENGTH: usize = 12;

/// Domain service for authentication, session resolution, and account
/// lifecycle.
///
/// Holds the process-wide hasher and token codec; both are immutable after
/// construction. All durable principal state lives behind the repository
/// ports.
pub struct AuthService<AR, DR>
where
    AR: AdminRepository,
    DR: DeviceRepository,
{
    admins: Arc<AR>,
    devices: Arc<DR>,
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

impl<AR, DR> AuthService<AR, DR>
where
    AR: AdminRepository,
    DR: DeviceRepository,
{
    pub fn new(admins: Arc<AR>, devices: Arc<DR>, token_codec: TokenCodec) -> Self {
        Self {
            admins,
            devices,
            password_hasher: PasswordHasher::new(),
            token_codec,
        }
    }

    /// Resolve an (identifier, secret, claimed kind) triple to a verified
    /// principal. Unknown identifiers and wrong secrets are
    /// indistinguishable to the caller.
    async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
        claimed_kind: PrincipalKind,
    ) -> Result<Principal, AuthError> {
        let principal = match claimed_kind {
            PrincipalKind::Admin => self
                .admins
                .find_by_username(identifier)
                .await?
                .map(Principal::Admin),
            PrincipalKind::Device => {
                let device = match LoginIdentifier::parse(identifier) {
                    LoginIdentifier::Id(id) => self.devices.find_by_id(&id).await?,
                    LoginIdentifier::Name(name) => self.devices.find_by_name(&name).await?,
                };
                device.map(Principal::Device)
            }
        };

        let Some(principal) = principal else {
            // Burn the same work as a verification so a lookup miss is not
            // observably faster than a wrong secret
            let _ = self.password_hasher.hash(password);
            return Err(AuthError::InvalidCredentials);
        };

        let stored_hash = match &principal {
            Principal::Admin(admin) => &admin.password_hash,
            Principal::Device(device) => &device.password_hash,
        };

        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(principal)
    }

    fn generate_temp_password() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TEMP_PASSWORD_LENGTH)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl<AR, DR> AuthServicePort for AuthService<AR, DR>
where
    AR: AdminRepository,
    DR: DeviceRepository,
{
    async fn login(
        &self,
        identifier: &str,
        password: &str,
        claimed_kind: PrincipalKind,
    ) -> Result<LoginOutcome, AuthError> {
        let principal = self.authenticate(identifier, password, claimed_kind).await?;

        let access_token = self
            .token_codec
            .issue(&principal.subject(), principal.kind())
            .map_err(|e| AuthError::Token(e.to_string()))?;

        tracing::info!(user_type = %principal.kind(), "Login succeeded");

        Ok(LoginOutcome {
            access_token,
            principal,
        })
    }

    async fn resolve_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.token_codec.verify(token).map_err(|e| {
            tracing::warn!("Token validation failed: {}", e);
            AuthError::Unauthorized
        })?;

        // The token only names the principal; the store decides whether it
        // still exists and what its current state is
        match claims.user_type {
            PrincipalKind::Admin => {
                let admin_id: i32 = claims.sub.parse().map_err(|_| AuthError::Unauthorized)?;
                self.admins
                    .find_by_id(admin_id)
                    .await?
                    .map(Principal::Admin)
                    .ok_or(AuthError::Unauthorized)
            }
            PrincipalKind::Device => {
                let device_id =
                    DeviceId::from_string(&claims.sub).map_err(|_| AuthError::Unauthorized)?;
                self.devices
                    .find_by_id(&device_id)
                    .await?
                    .map(Principal::Device)
                    .ok_or(AuthError::Unauthorized)
            }
        }
    }

    async fn change_password(
        &self,
        principal: &Principal,
        command: ChangePasswordCommand,
    ) -> Result<(), AuthError> {
        let stored_hash = match principal {
            Principal::Admin(admin) => &admin.password_hash,
            Principal::Device(device) => &device.password_hash,
        };

        if !self
            .password_hasher
            .verify(&command.current_password, stored_hash)
        {
            return Err(AuthError::InvalidCurrentPassword);
        }

        let new_hash = self.password_hasher.hash(&command.new_password)?;

        match principal {
            Principal::Admin(admin) => {
                self.admins
                    .update_password_hash(admin.admin_id, &new_hash)
                    .await
            }
            Principal::Device(device) => {
                // Rotating the secret is what clears the forced-change flag
                self.devices
                    .update_password_hash(&device.device_id, &new_hash, false)
                    .await
            }
        }
    }

    async fn create_device(
        &self,
        command: CreateDeviceCommand,
    ) -> Result<ProvisionedDevice, AuthError> {
        if self
            .devices
            .find_by_name(command.device_name.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::DeviceNameExists(
                command.device_name.to_string(),
            ));
        }

        let temp_password = command
            .password
            .filter(|p| !p.is_empty())
            .unwrap_or_else(Self::generate_temp_password);

        let device = Device {
            device_id: DeviceId::new(),
            device_name: command.device_name,
            password_hash: self.password_hasher.hash(&temp_password)?,
            force_password_change: true,
            created_at: Utc::now(),
        };

        let device = self.devices.create(device).await?;

        tracing::info!(device_id = %device.device_id, "Device provisioned");

        Ok(ProvisionedDevice {
            device,
            temp_password,
        })
    }

    async fn list_devices(&self) -> Result<Vec<Device>, AuthError> {
        self.devices.list_all().await
    }

    async fn delete_device(&self, id: &DeviceId) -> Result<(), AuthError> {
        self.devices.delete(id).await?;
        tracing::info!(device_id = %id, "Device deleted");
        Ok(())
    }

    async fn reset_device_password(&self, id: &DeviceId) -> Result<ProvisionedDevice, AuthError> {
        let mut device = self
            .devices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::DeviceNotFound(id.to_string()))?;

        let temp_password = Self::generate_temp_password();
        let new_hash = self.password_hasher.hash(&temp_password)?;

        self.devices
            .update_password_hash(id, &new_hash, true)
            .await?;

        device.password_hash = new_hash;
        device.force_password_change = true;

        tracing::info!(device_id = %id, "Device password reset");

        Ok(ProvisionedDevice {
            device,
            temp_password,
        })
    }

    async fn create_first_admin(&self, command: CreateAdminCommand) -> Result<Admin, AuthError> {
        if self.admins.count().await? > 0 {
            return Err(AuthError::AdminBootstrapClosed);
        }

        let password_hash = self.password_hasher.hash(&command.password)?;
        let admin = self.admins.create(&command.username, &password_hash).await?;

        tracing::info!(admin_id = admin.admin_id, "Bootstrap admin created");

        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::principal::models::DeviceName;
    use crate::principal::models::Username;

    mock! {
        pub TestAdminRepository {}

        #[async_trait]
        impl AdminRepository for TestAdminRepository {
            async fn find_by_id(&self, admin_id: i32) -> Result<Option<Admin>, AuthError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, AuthError>;
            async fn count(&self) -> Result<i64, AuthError>;
            async fn create(&self, username: &Username, password_hash: &str) -> Result<Admin, AuthError>;
            async fn update_password_hash(&self, admin_id: i32, password_hash: &str) -> Result<(), AuthError>;
        }
    }

    mock! {
        pub TestDeviceRepository {}

        #[async_trait]
        impl DeviceRepository for TestDeviceRepository {
            async fn find_by_id(&self, id: &DeviceId) -> Result<Option<Device>, AuthError>;
            async fn find_by_name(&self, name: &str) -> Result<Option<Device>, AuthError>;
            async fn list_all(&self) -> Result<Vec<Device>, AuthError>;
            async fn create(&self, device: Device) -> Result<Device, AuthError>;
            async fn delete(&self, id: &DeviceId) -> Result<(), AuthError>;
            async fn update_password_hash(
                &self,
                id: &DeviceId,
                password_hash: &str,
                force_password_change: bool,
            ) -> Result<(), AuthError>;
        }
    }

    const TEST_SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn service(
        admins: MockTestAdminRepository,
        devices: MockTestDeviceRepository,
    ) -> AuthService<MockTestAdminRepository, MockTestDeviceRepository> {
        AuthService::new(
            Arc::new(admins),
            Arc::new(devices),
            TokenCodec::new(TEST_SECRET, 24),
        )
    }

    fn stored_admin(password: &str) -> Admin {
        Admin {
            admin_id: 7,
            username: Username::new("root_admin".to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
        }
    }

    fn stored_device(password: &str) -> Device {
        Device {
            device_id: DeviceId::new(),
            device_name: DeviceName::new("kitchen-meter".to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            force_password_change: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_admin_login_success() {
        let mut admins = MockTestAdminRepository::new();
        let devices = MockTestDeviceRepository::new();

        let admin = stored_admin("correct-horse");
        admins
            .expect_find_by_username()
            .with(eq("root_admin"))
            .times(1)
            .returning(move |_| Ok(Some(admin.clone())));

        let service = service(admins, devices);

        let outcome = service
            .login("root_admin", "correct-horse", PrincipalKind::Admin)
            .await
            .expect("login failed");

        assert!(!outcome.access_token.is_empty());
        assert_eq!(outcome.principal.kind(), PrincipalKind::Admin);
        assert!(!outcome.principal.force_password_change());
    }

    #[tokio::test]
    async fn test_unknown_and_wrong_secret_are_indistinguishable() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        let device = stored_device("right-password");
        devices
            .expect_find_by_name()
            .with(eq("ghost-meter"))
            .times(1)
            .returning(|_| Ok(None));
        devices
            .expect_find_by_name()
            .with(eq("kitchen-meter"))
            .times(1)
            .returning(move |_| Ok(Some(device.clone())));

        let service = service(admins, devices);

        let missing = service
            .login("ghost-meter", "anything", PrincipalKind::Device)
            .await;
        let wrong = service
            .login("kitchen-meter", "wrong-password", PrincipalKind::Device)
            .await;

        assert!(matches!(missing, Err(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_device_uuid_identifier_skips_name_lookup() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        let device = stored_device("device-secret");
        let device_id = device.device_id;

        devices
            .expect_find_by_id()
            .withf(move |id| *id == device_id)
            .times(1)
            .returning(move |_| Ok(Some(device.clone())));
        devices.expect_find_by_name().times(0);

        let service = service(admins, devices);

        let outcome = service
            .login(&device_id.to_string(), "device-secret", PrincipalKind::Device)
            .await
            .expect("login failed");

        assert_eq!(outcome.principal.subject(), device_id.to_string());
    }

    #[tokio::test]
    async fn test_device_name_identifier_uses_name_lookup() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        let device = stored_device("device-secret");
        devices.expect_find_by_id().times(0);
        devices
            .expect_find_by_name()
            .with(eq("kitchen-meter"))
            .times(1)
            .returning(move |_| Ok(Some(device.clone())));

        let service = service(admins, devices);

        let outcome = service
            .login("kitchen-meter", "device-secret", PrincipalKind::Device)
            .await
            .expect("login failed");

        assert_eq!(outcome.principal.kind(), PrincipalKind::Device);
    }

    #[tokio::test]
    async fn test_resolve_token_round_trip() {
        let mut admins = MockTestAdminRepository::new();
        let devices = MockTestDeviceRepository::new();

        let admin = stored_admin("correct-horse");
        let fetched = admin.clone();
        admins
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(admin.clone())));
        admins
            .expect_find_by_id()
            .with(eq(7))
            .times(1)
            .returning(move |_| Ok(Some(fetched.clone())));

        let service = service(admins, devices);

        let outcome = service
            .login("root_admin", "correct-horse", PrincipalKind::Admin)
            .await
            .expect("login failed");

        let principal = service
            .resolve_token(&outcome.access_token)
            .await
            .expect("resolve failed");

        assert_eq!(principal.subject(), "7");
        assert_eq!(principal.kind(), PrincipalKind::Admin);
    }

    #[tokio::test]
    async fn test_resolve_token_for_deleted_device_is_unauthorized() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        devices
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(admins, devices);

        let token = TokenCodec::new(TEST_SECRET, 24)
            .issue(&DeviceId::new().to_string(), PrincipalKind::Device)
            .unwrap();

        let result = service.resolve_token(&token).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_resolve_garbage_token_is_unauthorized() {
        let service = service(
            MockTestAdminRepository::new(),
            MockTestDeviceRepository::new(),
        );

        let result = service.resolve_token("not.a.token").await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_resolve_token_with_mismatched_subject_shape_is_unauthorized() {
        let service = service(
            MockTestAdminRepository::new(),
            MockTestDeviceRepository::new(),
        );

        // Device-kind token with an admin-shaped (non-UUID) subject
        let token = TokenCodec::new(TEST_SECRET, 24)
            .issue("7", PrincipalKind::Device)
            .unwrap();

        let result = service.resolve_token(&token).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_change_password_wrong_current_leaves_hash_untouched() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        devices.expect_update_password_hash().times(0);

        let service = service(admins, devices);
        let principal = Principal::Device(stored_device("actual-password"));

        let result = service
            .change_password(
                &principal,
                ChangePasswordCommand {
                    current_password: "guess".to_string(),
                    new_password: "new-password".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCurrentPassword)));
    }

    #[tokio::test]
    async fn test_change_password_clears_force_flag_for_devices() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        let device = stored_device("temp-password");
        let device_id = device.device_id;

        devices
            .expect_update_password_hash()
            .withf(move |id, hash, force| {
                *id == device_id && hash.starts_with("$argon2") && !*force
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(admins, devices);
        let principal = Principal::Device(device);

        service
            .change_password(
                &principal,
                ChangePasswordCommand {
                    current_password: "temp-password".to_string(),
                    new_password: "rotated-password".to_string(),
                },
            )
            .await
            .expect("change_password failed");
    }

    #[tokio::test]
    async fn test_create_device_generates_temp_password_and_forces_rotation() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        devices
            .expect_find_by_name()
            .times(1)
            .returning(|_| Ok(None));
        devices
            .expect_create()
            .withf(|device| device.force_password_change)
            .times(1)
            .returning(|device| Ok(device));

        let service = service(admins, devices);

        let provisioned = service
            .create_device(CreateDeviceCommand {
                device_name: DeviceName::new("garage-meter".to_string()).unwrap(),
                password: None,
            })
            .await
            .expect("create_device failed");

        assert_eq!(provisioned.temp_password.len(), TEMP_PASSWORD_LENGTH);
        assert!(provisioned.device.force_password_change);
        assert!(PasswordHasher::new().verify(
            &provisioned.temp_password,
            &provisioned.device.password_hash
        ));
    }

    #[tokio::test]
    async fn test_create_device_duplicate_name() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        let existing = stored_device("whatever");
        devices
            .expect_find_by_name()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        devices.expect_create().times(0);

        let service = service(admins, devices);

        let result = service
            .create_device(CreateDeviceCommand {
                device_name: DeviceName::new("kitchen-meter".to_string()).unwrap(),
                password: None,
            })
            .await;

        assert!(matches!(result, Err(AuthError::DeviceNameExists(_))));
    }

    #[tokio::test]
    async fn test_reset_device_password_reforces_rotation() {
        let admins = MockTestAdminRepository::new();
        let mut devices = MockTestDeviceRepository::new();

        let mut device = stored_device("old-password");
        device.force_password_change = false;
        let device_id = device.device_id;

        devices
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(device.clone())));
        devices
            .expect_update_password_hash()
            .withf(move |id, _, force| *id == device_id && *force)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(admins, devices);

        let provisioned = service
            .reset_device_password(&device_id)
            .await
            .expect("reset failed");

        assert!(provisioned.device.force_password_change);
        assert!(PasswordHasher::new().verify(
            &provisioned.temp_password,
            &provisioned.device.password_hash
        ));
    }

    #[tokio::test]
    async fn test_create_first_admin_closed_once_one_exists() {
        let mut admins = MockTestAdminRepository::new();
        let devices = MockTestDeviceRepository::new();

        admins.expect_count().times(1).returning(|| Ok(1));
        admins.expect_create().times(0);

        let service = service(admins, devices);

        let result = service
            .create_first_admin(CreateAdminCommand {
                username: Username::new("second_admin".to_string()).unwrap(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::AdminBootstrapClosed)));
    }

    #[tokio::test]
    async fn test_create_first_admin_succeeds_when_none_exist() {
        let mut admins = MockTestAdminRepository::new();
        let devices = MockTestDeviceRepository::new();

        admins.expect_count().times(1).returning(|| Ok(0));
        admins
            .expect_create()
            .withf(|username, hash| {
                username.as_str() == "root_admin" && hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|username, hash| {
                Ok(Admin {
                    admin_id: 1,
                    username: username.clone(),
                    password_hash: hash.to_string(),
                })
            });

        let service = service(admins, devices);

        let admin = service
            .create_first_admin(CreateAdminCommand {
                username: Username::new("root_admin".to_string()).unwrap(),
                password: "password123".to_string(),
            })
            .await
            .expect("bootstrap failed");

        assert_eq!(admin.admin_id, 1);
    }
}
