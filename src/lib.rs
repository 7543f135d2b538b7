//! Employee records service.
//!
//! Stores employees together with their contacts and addresses in PostgreSQL
//! and exposes them over a small JSON HTTP API.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;
pub mod utils;

use actix_web::web;

use errors::AppError;

/// Registers the routes and extractor error handlers on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .service(web::resource("/").route(web::get().to(handlers::health::health_check)))
    .service(
        web::scope("/api/v1/employees")
            .service(
                web::resource("")
                    .route(web::post().to(handlers::employee::create_employee))
                    .route(web::get().to(handlers::employee::get_employees)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(handlers::employee::get_employee))
                    .route(web::put().to(handlers::employee::update_employee))
                    .route(web::delete().to(handlers::employee::delete_employee)),
            ),
    );
}
