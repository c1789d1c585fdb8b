use async_trait::async_trait;
use sqlx::PgPool;

use crate::principal::errors::AuthError;
use crate::principal::models::Admin;
use crate::principal::models::Username;
use crate::principal::ports::AdminRepository;

pub struct PostgresAdminRepository {
    pool: PgPool,
}

impl PostgresAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AdminRow {
    admin_id: i32,
    username: String,
    password_hash: String,
}

impl AdminRow {
    fn into_admin(self) -> Result<Admin, AuthError> {
        Ok(Admin {
            admin_id: self.admin_id,
            username: Username::new(self.username)?,
            password_hash: self.password_hash,
        })
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
    async fn find_by_id(&self, admin_id: i32) -> Result<Option<Admin>, AuthError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT admin_id, username, password_hash
            FROM admins
            WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(AdminRow::into_admin).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, AuthError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT admin_id, username, password_hash
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(AdminRow::into_admin).transpose()
    }

    async fn count(&self) -> Result<i64, AuthError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    async fn create(&self, username: &Username, password_hash: &str) -> Result<Admin, AuthError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            INSERT INTO admins (username, password_hash)
            VALUES ($1, $2)
            RETURNING admin_id, username, password_hash
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AuthError::UsernameExists(username.to_string());
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        row.into_admin()
    }

    async fn update_password_hash(
        &self,
        admin_id: i32,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE admins
            SET password_hash = $1
            WHERE admin_id = $2
            "#,
        )
        .bind(password_hash)
        .bind(admin_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::AdminNotFound(admin_id.to_string()));
        }

        Ok(())
    }
}
