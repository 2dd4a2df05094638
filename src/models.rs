use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserId;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsReq {
    #[serde(alias = "username")]
    #[schema(example = "alice")]
    pub user_name: String,
    #[schema(example = "s3cret-pass", format = "password")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordReq {
    #[serde(alias = "username")]
    #[schema(example = "alice")]
    pub user_name: String,
    #[serde(alias = "new_password")]
    #[schema(example = "n3w-s3cret", format = "password")]
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Absolute expiry of `token`.
    #[schema(example = "2026-01-01T10:00:00Z", format = "date-time", value_type = String)]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user_id: UserId,
    pub user_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}
