//! User repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::User;
use crate::utils::errors::TourbookError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a pre-hashed credential
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        password_salt: &str,
        full_name: &str,
        role: &str,
    ) -> Result<User, TourbookError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, password_salt, full_name, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, true, $6, $6)
            RETURNING id, email, password_hash, password_salt, full_name, role, is_active, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(password_salt)
        .bind(full_name)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, TourbookError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, password_salt, full_name, role, is_active, created_at, updated_at FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, TourbookError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, password_salt, full_name, role, is_active, created_at, updated_at FROM users WHERE lower(email) = lower($1)"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user profile fields
    pub async fn update(
        &self,
        id: i64,
        email: Option<&str>,
        full_name: Option<&str>,
        role: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<User, TourbookError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active),
                updated_at = $6
            WHERE id = $1
            RETURNING id, email, password_hash, password_salt, full_name, role, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(full_name)
        .bind(role)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// List users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, TourbookError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, password_salt, full_name, role, is_active, created_at, updated_at FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Delete user
    pub async fn delete(&self, id: i64) -> Result<(), TourbookError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, TourbookError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
