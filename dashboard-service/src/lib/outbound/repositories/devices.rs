use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::principal::errors::AuthError;
use crate::principal::models::Device;
use crate::principal::models::DeviceId;
use crate::principal::models::DeviceName;
use crate::principal::ports::DeviceRepository;

pub struct PostgresDeviceRepository {
    pool: PgPool,
}

impl PostgresDeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DeviceRow {
    device_id: Uuid,
    device_name: String,
    password_hash: String,
    force_password_change: bool,
    created_at: DateTime<Utc>,
}

impl DeviceRow {
    fn into_device(self) -> Result<Device, AuthError> {
        Ok(Device {
            device_id: DeviceId(self.device_id),
            device_name: DeviceName::new(self.device_name)?,
            password_hash: self.password_hash,
            force_password_change: self.force_password_change,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl DeviceRepository for PostgresDeviceRepository {
    async fn find_by_id(&self, id: &DeviceId) -> Result<Option<Device>, AuthError> {
        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT device_id, device_name, password_hash, force_password_change, created_at
            FROM devices
            WHERE device_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(DeviceRow::into_device).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Device>, AuthError> {
        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT device_id, device_name, password_hash, force_password_change, created_at
            FROM devices
            WHERE device_name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(DeviceRow::into_device).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Device>, AuthError> {
        let rows = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT device_id, device_name, password_hash, force_password_change, created_at
            FROM devices
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(DeviceRow::into_device).collect()
    }

    async fn create(&self, device: Device) -> Result<Device, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO devices (device_id, device_name, password_hash, force_password_change, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(device.device_id.0)
        .bind(device.device_name.as_str())
        .bind(&device.password_hash)
        .bind(device.force_password_change)
        .bind(device.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("devices_device_name_key")
                {
                    return AuthError::DeviceNameExists(device.device_name.to_string());
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(device)
    }

    async fn delete(&self, id: &DeviceId) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            DELETE FROM devices
            WHERE device_id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::DeviceNotFound(id.to_string()));
        }

        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: &DeviceId,
        password_hash: &str,
        force_password_change: bool,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET password_hash = $1, force_password_change = $2
            WHERE device_id = $3
            "#,
        )
        .bind(password_hash)
        .bind(force_password_change)
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::DeviceNotFound(id.to_string()));
        }

        Ok(())
    }
}
