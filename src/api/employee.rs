use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::employee::{EmployeeId, EmployeeInput, EmployeeResponse};
use crate::models::{ErrorResponse, MessageResponse};
use crate::state::AppState;

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeInput,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "Email already used by an employee", body = ErrorResponse, example = json!({
            "error": "An employee with this email already exists."
        })),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    let employee = state.employees.create(auth.user_id, &payload).await?;

    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

/// List the caller's employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employees owned by the caller", body = [EmployeeResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let employees: Vec<EmployeeResponse> = state
        .employees
        .list(auth.user_id)
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse, example = json!({
            "error": "Employee does not exist with given id: 7"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<EmployeeId>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let employee = state.employees.get(auth.user_id, employee_id).await?;

    Ok(HttpResponse::Ok().json(EmployeeResponse::from(employee)))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee ID")
    ),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 409, description = "Email already used by an employee", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<EmployeeId>,
    payload: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let employee = state
        .employees
        .update(auth.user_id, employee_id, &payload)
        .await?;

    Ok(HttpResponse::Ok().json(EmployeeResponse::from(employee)))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse, example = json!({
            "message": "Employee with id 7 deleted successfully."
        })),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<EmployeeId>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    state.employees.delete(auth.user_id, employee_id).await?;
    debug!(employee_id, "Delete acknowledged");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Employee with id {employee_id} deleted successfully."),
    }))
}
