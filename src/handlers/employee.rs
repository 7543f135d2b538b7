use actix_web::{web, HttpResponse};
use log::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::repository::EmployeeRepository;
use crate::schemas::{EmployeeUpdate, ListParams, NewEmployee};
use crate::utils::validation::validate_payload;

pub async fn create_employee(
    repo: web::Data<dyn EmployeeRepository>,
    new_employee: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_employee)?;

    if repo
        .find_by_employee_id(&new_employee.employee_id)
        .await?
        .is_some()
    {
        warn!("Rejected duplicate employee_id {}", new_employee.employee_id);
        return Err(AppError::duplicate_employee_id(&new_employee.employee_id));
    }

    // A concurrent create can still win the race; the unique index turns that into a conflict.
    let employee = repo.create(&new_employee).await.map_err(|err| {
        if let AppError::Conflict(msg) = &err {
            warn!("Create of {} lost a uniqueness race: {}", new_employee.employee_id, msg);
        }
        err
    })?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn get_employees(
    repo: web::Data<dyn EmployeeRepository>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*query)?;

    let employees = repo.list(query.skip, query.limit).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    repo: web::Data<dyn EmployeeRepository>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let employee = repo
        .find_by_id(id.into_inner())
        .await?
        .ok_or_else(AppError::employee_not_found)?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn update_employee(
    repo: web::Data<dyn EmployeeRepository>,
    id: web::Path<Uuid>,
    updates: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let existing = repo
        .find_by_id(id.into_inner())
        .await?
        .ok_or_else(AppError::employee_not_found)?;

    // Nothing to apply: the record and its timestamp stay as they are.
    if updates.is_empty() {
        return Ok(HttpResponse::Ok().json(existing));
    }

    let employee = repo.update(&existing, &updates).await?;
    info!("Employee {} updated", employee.employee.employee_id);

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    repo: web::Data<dyn EmployeeRepository>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let employee = repo
        .delete(id.into_inner())
        .await?
        .ok_or_else(AppError::employee_not_found)?;
    info!("Employee {} deleted", employee.employee.employee_id);

    Ok(HttpResponse::Ok().json(employee))
}
