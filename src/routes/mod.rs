//! Route table and dispatch policy.
//!
//! Dispatch is by path shape and method. A matched shape with an unmatched
//! method answers 405 through the per-resource default service, never 404.
//! `/login`, `/register`, and the `/users` collection listing are public;
//! everything else sits behind [`OwnerGuard`].

pub mod auth;
pub mod tasks;
pub mod users;

use std::sync::Arc;

use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest, HttpResponse};

use crate::auth::{OwnerGuard, TokenService};
use crate::error::ApiError;
use crate::store::Storage;

/// Builds the app configuration closure used by both `main` and the test
/// suites.
pub fn configure(
    store: Arc<dyn Storage>,
    tokens: TokenService,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::from(Arc::clone(&store)))
            .app_data(web::Data::new(tokens.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .service(
                web::resource("/login")
                    .route(web::post().to(auth::login))
                    .default_service(web::route().to(method_not_allowed)),
            )
            .service(
                web::resource("/register")
                    .route(web::post().to(auth::register))
                    .default_service(web::route().to(method_not_allowed)),
            )
            .service(
                web::resource("/users")
                    .route(web::get().to(users::list_users))
                    .default_service(web::route().to(method_not_allowed)),
            )
            .service(
                web::resource("/users/{user_id}")
                    .wrap(OwnerGuard::new(Arc::clone(&store), tokens.clone()))
                    .route(web::get().to(users::get_user))
                    .route(web::put().to(users::update_user))
                    .route(web::delete().to(users::delete_user))
                    .default_service(web::route().to(method_not_allowed)),
            )
            .service(
                web::scope("/tasks")
                    .wrap(OwnerGuard::new(store, tokens))
                    .service(
                        web::resource("/{user_id}")
                            .route(web::get().to(tasks::list_tasks))
                            .route(web::post().to(tasks::create_task))
                            .default_service(web::route().to(method_not_allowed)),
                    )
                    .service(
                        web::resource("/{user_id}/{task_id}")
                            .route(web::get().to(tasks::get_task))
                            .route(web::put().to(tasks::update_task))
                            .route(web::delete().to(tasks::delete_task))
                            .default_service(web::route().to(method_not_allowed)),
                    ),
            );
    }
}

async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}

/// Malformed JSON bodies land in the standard error envelope with a 400.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

/// Unparseable path segments (a bad task id, for example) are 400s, not 404s.
fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}
