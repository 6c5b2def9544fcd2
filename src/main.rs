use std::sync::Mutex;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod docs;
mod error;
mod export;
mod model;
mod routes;
mod session;
mod store;
mod workflow;

use config::Config;
use session::Session;
use store::{CsvStore, DocumentStore, TableStore};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "E-Leave Management System"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "eleave.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = CsvStore::new(&config.data_dir);
    store
        .seed_defaults()
        .with_context(|| format!("failed to prepare data directory {}", config.data_dir.display()))?;
    let documents = DocumentStore::new(&config.upload_dir);
    documents
        .ensure_dir()
        .with_context(|| format!("failed to create upload directory {}", config.upload_dir.display()))?;

    let session = Data::new(Mutex::new(Session::init(store, documents)));
    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, data_dir = %config.data_dir.display(), "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(session.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
