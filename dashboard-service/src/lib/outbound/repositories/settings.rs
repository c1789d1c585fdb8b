use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::principal::models::DeviceId;
use crate::settings::errors::SettingsError;
use crate::settings::ports::SettingsRepository;

pub struct PostgresSettingsRepository {
    pool: PgPool,
}

impl PostgresSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepository {
    async fn rotate_rate(
        &self,
        device_id: &DeviceId,
        new_rate: f64,
        changed_at: DateTime<Utc>,
    ) -> Result<(), SettingsError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;

        // Serialization point. Locking the device row first means a
        // concurrent rotation waits here, and its later statements run
        // against snapshots that include this transaction's commit. An
        // UPDATE on the open rate row alone is not enough: under READ
        // COMMITTED the waiter's UPDATE re-evaluates to zero rows and its
        // INSERT adds a second open row.
        let device_row =
            sqlx::query("SELECT device_id FROM devices WHERE device_id = $1 FOR UPDATE")
                .bind(device_id.0)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;

        if device_row.is_none() {
            return Err(SettingsError::DeviceNotFound(device_id.to_string()));
        }

        sqlx::query(
            r#"
            UPDATE settings
            SET end_time = $1
            WHERE name = 'rate' AND device_id = $2 AND end_time IS NULL
            "#,
        )
        .bind(changed_at)
        .bind(device_id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO settings (device_id, name, value, start_time, end_time)
            VALUES ($1, 'rate', $2, $3, NULL)
            "#,
        )
        .bind(device_id.0)
        .bind(new_rate)
        .bind(changed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;

        // Dropping the transaction without commit rolls back; no caller can
        // observe the closed-but-not-replaced state
        tx.commit()
            .await
            .map_err(|e| SettingsError::DatabaseError(e.to_string()))
    }
}
