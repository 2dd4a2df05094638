use crate::model::employee::{EmployeeInput, EmployeeResponse};
use crate::models::{CredentialsReq, ErrorResponse, MessageResponse, ResetPasswordReq, TokenResponse};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management System API",
        version = "1.0.0",
        description = r#"
## Employee Management System (EMS)

Every user manages a private set of employee records.

### 🔹 Key Features
- **Accounts**
  - Sign up, sign in, and reset a password
- **Employee Management**
  - Create, update, list, view and delete your own employees

### 🔐 Security
Employee endpoints require a **JWT Bearer token** from `/auth/signup` or `/auth/signin`.
Records belonging to other users are reported as not found.
Employee emails are unique across all users.

### 📦 Response Format
- JSON-based RESTful responses
- Errors are returned as `{"error": "..."}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::signup,
        crate::auth::handlers::signin,
        crate::auth::handlers::reset_password,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee
    ),
    components(
        schemas(
            CredentialsReq,
            ResetPasswordReq,
            TokenResponse,
            MessageResponse,
            ErrorResponse,
            EmployeeInput,
            EmployeeResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Account and token APIs"),
        (name = "Employee", description = "Employee management APIs"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the employee paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
