use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

use crate::auth::service::Session;
use crate::error::AppError;
use crate::models::{CredentialsReq, ErrorResponse, MessageResponse, ResetPasswordReq, TokenResponse};
use crate::state::AppState;

impl From<Session> for TokenResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token.token,
            token_type: "Bearer".to_string(),
            expires_at: session.token.expires_at,
            user_id: session.user_id,
            user_name: session.username,
        }
    }
}

/// Register a new user and sign them in
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = CredentialsReq,
    responses(
        (status = 201, description = "User registered, token issued", body = TokenResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 409, description = "Username is already taken", body = ErrorResponse, example = json!({
            "error": "Username is already taken."
        })),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_signup",
    skip(state, body),
    fields(username = %body.user_name)
)]
pub async fn signup(
    body: web::Json<CredentialsReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Signup request received");

    let session = state.auth.signup(&body.user_name, &body.password).await?;

    Ok(HttpResponse::Created().json(TokenResponse::from(session)))
}

/// Exchange username and password for a bearer token
#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = CredentialsReq,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse, example = json!({
            "error": "Invalid username or password"
        })),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_signin",
    skip(state, body),
    fields(username = %body.user_name)
)]
pub async fn signin(
    body: web::Json<CredentialsReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Signin request received");

    let session = state.auth.signin(&body.user_name, &body.password).await?;
    info!("Signin successful");

    Ok(HttpResponse::Ok().json(TokenResponse::from(session)))
}

/// Replace a user's password.
///
/// No proof of the old password is required, and tokens issued before the
/// reset remain valid until they expire.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordReq,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse, example = json!({
            "message": "Password reset successfully"
        })),
        (status = 400, description = "Missing username or new password", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_reset_password",
    skip(state, body),
    fields(username = %body.user_name)
)]
pub async fn reset_password(
    body: web::Json<ResetPasswordReq>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Password reset request received");

    state
        .auth
        .reset_password(&body.user_name, &body.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}
