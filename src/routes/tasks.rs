//! Task handlers for `/tasks/{user_id}` and `/tasks/{user_id}/{task_id}`.
//!
//! These run behind [`crate::auth::OwnerGuard`], which has already proven
//! that the caller's token belongs to the path's user id; the handlers pass
//! that id straight into the store's owner-scoped operations.

use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Task, TaskPayload};
use crate::store::Storage;

/// `GET /tasks/{user_id}`: every task owned by the user.
pub async fn list_tasks(
    store: web::Data<dyn Storage>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let tasks = store.tasks_for_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// `POST /tasks/{user_id}`: create a task for the user.
pub async fn create_task(
    store: web::Data<dyn Storage>,
    path: web::Path<Uuid>,
    payload: web::Json<TaskPayload>,
) -> Result<impl Responder, ApiError> {
    let task = Task::new(payload.into_inner(), path.into_inner())?;
    let task = store.create_task(task).await?;
    Ok(HttpResponse::Created().json(task))
}

/// `GET /tasks/{user_id}/{task_id}`.
pub async fn get_task(
    store: web::Data<dyn Storage>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, ApiError> {
    let (user_id, task_id) = path.into_inner();
    let task = store.task_for_user(user_id, task_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// `PUT /tasks/{user_id}/{task_id}`: partial merge update.
///
/// Fetches the current row, overwrites the non-empty payload fields, and
/// writes the result back.
pub async fn update_task(
    store: web::Data<dyn Storage>,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<TaskPayload>,
) -> Result<impl Responder, ApiError> {
    let (user_id, task_id) = path.into_inner();

    let mut task = store.task_for_user(user_id, task_id).await?;
    task.apply(&payload)?;
    store.update_task(&task).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// `DELETE /tasks/{user_id}/{task_id}`.
pub async fn delete_task(
    store: web::Data<dyn Storage>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, ApiError> {
    let (user_id, task_id) = path.into_inner();
    store.delete_task(user_id, task_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
