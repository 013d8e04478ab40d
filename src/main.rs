use std::process;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use env_logger::Env;

use supplier_uploads::db::{establish_connection_pool, run_migrations};
use supplier_uploads::models::config::ServerConfig;
use supplier_uploads::repository::DieselRepository;
use supplier_uploads::routes::{configure_app, cors};
use supplier_uploads::storage::UploadStorage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to open database {}: {e}", server_config.database_url);
            process::exit(1);
        }
    };

    match run_migrations(&pool) {
        Ok(0) => {}
        Ok(applied) => log::info!("Applied {applied} database migration(s)"),
        Err(e) => {
            log::error!("Failed to run database migrations: {e}");
            process::exit(1);
        }
    }

    let storage = match UploadStorage::new(&server_config.upload_dir) {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Failed to prepare content directory: {e}");
            process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Serving uploads from {} on {}:{}",
        storage.root().display(),
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&server_config))
            .wrap(Logger::default())
            .configure(|cfg| configure_app(cfg, repo.clone(), storage.clone(), &server_config))
    })
    .bind(bind_address)?
    .run()
    .await
}
