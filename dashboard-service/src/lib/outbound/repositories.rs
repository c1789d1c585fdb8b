pub mod admins;
pub mod devices;
pub mod settings;

pub use admins::PostgresAdminRepository;
pub use devices::PostgresDeviceRepository;
pub use settings::PostgresSettingsRepository;
