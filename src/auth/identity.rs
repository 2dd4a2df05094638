use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::jwt::{TokenError, TokenService};
use crate::error::AppError;
use crate::model::user::User;
use crate::store::CredentialStore;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("token subject no longer exists")]
    UserNotFound,
    #[error("credential store failure: {0}")]
    Backend(AppError),
}

/// Token failures and vanished users all become a bare `Unauthorized`;
/// only store failures keep their identity (as a 500).
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Token(kind) => {
                warn!(reason = %kind, "Rejected bearer token");
                AppError::Unauthorized
            }
            AuthError::UserNotFound => {
                warn!("Rejected bearer token for unknown user");
                AppError::Unauthorized
            }
            AuthError::Backend(e) => {
                error!(error = %e, "Identity lookup failed");
                e
            }
        }
    }
}

/// Turns a bearer token into the live user it was issued to.
pub struct IdentityResolver {
    tokens: Arc<TokenService>,
    credentials: Arc<dyn CredentialStore>,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<TokenService>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { tokens, credentials }
    }

    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let username = self.tokens.verify(token)?;

        self.credentials
            .find_by_username(&username)
            .await
            .map_err(AuthError::Backend)?
            .ok_or(AuthError::UserNotFound)
    }
}
