//! User handlers. The collection listing is public; the per-user routes run
//! behind [`crate::auth::OwnerGuard`].

use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::UserPayload;
use crate::store::Storage;

/// `GET /users`: public listing. Password digests never serialize.
pub async fn list_users(store: web::Data<dyn Storage>) -> Result<impl Responder, ApiError> {
    let users = store.users().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// `GET /users/{user_id}`.
pub async fn get_user(
    store: web::Data<dyn Storage>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let user = store.user_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// `PUT /users/{user_id}`: partial merge update; a non-empty password field
/// is re-hashed before storage.
pub async fn update_user(
    store: web::Data<dyn Storage>,
    path: web::Path<Uuid>,
    payload: web::Json<UserPayload>,
) -> Result<impl Responder, ApiError> {
    let mut user = store.user_by_id(path.into_inner()).await?;
    user.apply(&payload)?;
    store.update_user(&user).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// `DELETE /users/{user_id}`: cascades to the user's tasks.
pub async fn delete_user(
    store: web::Data<dyn Storage>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    store.delete_user(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
