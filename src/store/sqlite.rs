use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use super::{CredentialStore, EmployeeStore, user_not_found};
use crate::error::{AppError, unique_violation_as};
use crate::model::employee::{Employee, EmployeeId, EmployeeInput};
use crate::model::user::{User, UserId};

pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<UserId, AppError> {
        let id = sqlx::query_scalar::<_, UserId>(
            "INSERT INTO users (username, password_hash) VALUES (?, ?) RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_as(e, AppError::DuplicateUsername))?;

        debug!(user_id = id, "User row inserted");
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT id, username, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }
        Ok(())
    }
}

pub struct SqliteEmployeeStore {
    pool: SqlitePool,
}

impl SqliteEmployeeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for SqliteEmployeeStore {
    async fn insert(&self, owner_id: UserId, input: &EmployeeInput) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (first_name, last_name, email, owner_id)
            VALUES (?, ?, ?, ?)
            RETURNING id, first_name, last_name, email, owner_id
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_as(e, AppError::DuplicateEmail))
    }

    async fn email_taken(&self, email: &str) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn find_owned(&self, owner_id: UserId, id: EmployeeId) -> Result<Option<Employee>, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, owner_id
            FROM employees
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_owned(&self, owner_id: UserId) -> Result<Vec<Employee>, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, owner_id
            FROM employees
            WHERE owner_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update_owned(
        &self,
        owner_id: UserId,
        id: EmployeeId,
        input: &EmployeeInput,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET first_name = ?, last_name = ?, email = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation_as(e, AppError::DuplicateEmail))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_owned(&self, owner_id: UserId, id: EmployeeId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
