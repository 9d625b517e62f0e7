//! The storage capability gatekept by the auth middleware.
//!
//! [`Storage`] is implemented by [`postgres::PgStore`] for production and by
//! [`memory::MemStore`] for tests. Single-task operations take an explicit
//! owner id in addition to the task id: the middleware already guarantees the
//! caller owns the path identity, and the store filter backs that up at the
//! data layer.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Task, User};

pub use memory::MemStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, ApiError>;
    async fn task_for_user(&self, user_id: Uuid, task_id: Uuid) -> Result<Task, ApiError>;
    async fn create_task(&self, task: Task) -> Result<Task, ApiError>;
    async fn update_task(&self, task: &Task) -> Result<(), ApiError>;
    async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<(), ApiError>;

    async fn users(&self) -> Result<Vec<User>, ApiError>;
    async fn user_by_id(&self, id: Uuid) -> Result<User, ApiError>;
    async fn user_by_email(&self, email: &str) -> Result<User, ApiError>;
    async fn create_user(&self, user: User) -> Result<User, ApiError>;
    async fn update_user(&self, user: &User) -> Result<(), ApiError>;
    /// Deletes the user and, by cascade, every task they own.
    async fn delete_user(&self, id: Uuid) -> Result<(), ApiError>;
}
