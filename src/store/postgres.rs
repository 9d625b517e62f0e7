//! Postgres-backed [`Storage`] implementation.
//!
//! Email uniqueness and the owner cascade are enforced by the schema, not by
//! application code. All queries go through the connection pool, which is
//! safe for concurrent use; a failed or slow statement surfaces to the caller
//! unchanged, there is no retry.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Task, User};
use crate::store::Storage;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Creates the two tables if absent. The tasks table carries the
    /// ownership foreign key with `ON DELETE CASCADE`.
    pub async fn init_db(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                username TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                deadline TIMESTAMPTZ NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, deadline, created_at, updated_at, user_id
             FROM tasks WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn task_for_user(&self, user_id: Uuid, task_id: Uuid) -> Result<Task, ApiError> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, deadline, created_at, updated_at, user_id
             FROM tasks WHERE id = $1 AND user_id = $2",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        task.ok_or_else(|| ApiError::NotFound("task not found".into()))
    }

    async fn create_task(&self, task: Task) -> Result<Task, ApiError> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, deadline, created_at, updated_at, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(task.user_id)
        .execute(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE tasks SET title = $1, description = $2, deadline = $3, updated_at = $4
             WHERE id = $5 AND user_id = $6",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.updated_at)
        .bind(task.id)
        .bind(task.user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("task not found".into()));
        }
        Ok(())
    }

    async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("task not found".into()));
        }
        Ok(())
    }

    async fn users(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at, updated_at
             FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| ApiError::NotFound("user not found".into()))
    }

    async fn user_by_email(&self, email: &str) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| ApiError::NotFound("user not found".into()))
    }

    async fn create_user(&self, user: User) -> Result<User, ApiError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                ApiError::BadRequest("email already registered".into())
            }
            _ => ApiError::from(e),
        })?;
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE users SET username = $1, email = $2, password_hash = $3, updated_at = $4
             WHERE id = $5",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                ApiError::BadRequest("email already registered".into())
            }
            _ => ApiError::from(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("user not found".into()));
        }
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), ApiError> {
        // Owned tasks go with the row via the FK cascade.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("user not found".into()));
        }
        Ok(())
    }
}
