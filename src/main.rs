use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};

use tasklist_api::auth::TokenService;
use tasklist_api::config::Config;
use tasklist_api::routes;
use tasklist_api::store::{PgStore, Storage};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let store = PgStore::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    store.init_db().await.expect("failed to initialize schema");

    let store: Arc<dyn Storage> = Arc::new(store);
    let tokens = TokenService::new(config.jwt_secret.as_bytes());

    log::info!("tasklist API listening on {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::configure(Arc::clone(&store), tokens.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
