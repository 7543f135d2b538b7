use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

pub const EMPLOYEE_ID_CONSTRAINT: &str = "uq_employees_employee_id";
pub const CONTACT_EMAIL_CONSTRAINT: &str = "uq_employee_contacts_email_id";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation Error: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Internal Server Error: {0}")]
    Internal(String),
    #[error("Database Error: {0}")]
    Database(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn employee_not_found() -> Self {
        AppError::NotFound("Employee not found".to_string())
    }

    pub fn duplicate_employee_id(employee_id: &str) -> Self {
        AppError::Conflict(format!(
            "The employee with employee_id '{}' already exists.",
            employee_id
        ))
    }

    pub fn duplicate_email() -> Self {
        AppError::Conflict("A contact with this email_id already exists.".to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::employee_not_found(),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some(EMPLOYEE_ID_CONSTRAINT) => AppError::Conflict(
                        "An employee with this employee_id already exists.".to_string(),
                    ),
                    Some(CONTACT_EMAIL_CONSTRAINT) => AppError::duplicate_email(),
                    _ => AppError::Conflict("Resource already exists.".to_string()),
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Duplicate identifiers are reported as a bad request.
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            AppError::Internal(detail) | AppError::Database(detail) => {
                error!("Request failed: {}", detail);
                "Internal server error".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}
