//! In-memory [`Storage`] fake.
//!
//! Mirrors the behavior contract of the Postgres backend (email uniqueness,
//! owner-scoped task lookups, cascade delete) without a database, so the
//! integration suite can drive the full application hermetically.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Task, User};
use crate::store::Storage;

#[derive(Default)]
pub struct MemStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStore {
    async fn tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let tasks = self.tasks.read().unwrap();
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|t| t.created_at);
        Ok(owned)
    }

    async fn task_for_user(&self, user_id: Uuid, task_id: Uuid) -> Result<Task, ApiError> {
        let tasks = self.tasks.read().unwrap();
        tasks
            .get(&task_id)
            .filter(|t| t.user_id == user_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("task not found".into()))
    }

    async fn create_task(&self, task: Task) -> Result<Task, ApiError> {
        let mut tasks = self.tasks.write().unwrap();
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<(), ApiError> {
        let mut tasks = self.tasks.write().unwrap();
        match tasks.get_mut(&task.id) {
            Some(stored) if stored.user_id == task.user_id => {
                *stored = task.clone();
                Ok(())
            }
            _ => Err(ApiError::NotFound("task not found".into())),
        }
    }

    async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<(), ApiError> {
        let mut tasks = self.tasks.write().unwrap();
        match tasks.get(&task_id) {
            Some(task) if task.user_id == user_id => {
                tasks.remove(&task_id);
                Ok(())
            }
            _ => Err(ApiError::NotFound("task not found".into())),
        }
    }

    async fn users(&self) -> Result<Vec<User>, ApiError> {
        let users = self.users.read().unwrap();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<User, ApiError> {
        let users = self.users.read().unwrap();
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("user not found".into()))
    }

    async fn user_by_email(&self, email: &str) -> Result<User, ApiError> {
        let users = self.users.read().unwrap();
        users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("user not found".into()))
    }

    async fn create_user(&self, user: User) -> Result<User, ApiError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(ApiError::BadRequest("email already registered".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.write().unwrap();
        if users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(ApiError::BadRequest("email already registered".into()));
        }
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(ApiError::NotFound("user not found".into())),
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), ApiError> {
        let mut users = self.users.write().unwrap();
        if users.remove(&id).is_none() {
            return Err(ApiError::NotFound("user not found".into()));
        }
        // Cascade, as the FK does in Postgres.
        let mut tasks = self.tasks.write().unwrap();
        tasks.retain(|_, task| task.user_id != id);
        Ok(())
    }
}
