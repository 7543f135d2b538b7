use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath, TrailingSlash};
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use employee_service::config::Config;
use employee_service::db;
use employee_service::repository::{EmployeeRepository, PgEmployeeRepository};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|err| {
        error!("Invalid configuration: {}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;

    let pool = db::create_pool(&config).await.map_err(|err| {
        error!("Failed to connect to the database: {}", err);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, err)
    })?;

    if config.run_migrations {
        db::run_migrations(&pool).await.map_err(|err| {
            error!("Failed to apply migrations: {}", err);
            std::io::Error::new(std::io::ErrorKind::Other, err)
        })?;
    }

    let repo: Arc<dyn EmployeeRepository> = Arc::new(PgEmployeeRepository::new(pool));
    let repo = web::Data::from(repo);

    let (host, port) = config.bind_address();
    info!("Starting server at {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(Logger::default())
            .configure(employee_service::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
