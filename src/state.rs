use std::sync::Arc;

use crate::auth::identity::IdentityResolver;
use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordHasher;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::db::Stores;
use crate::error::AppError;
use crate::service::employee::EmployeeService;

/// Services shared by every worker, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub identity: Arc<IdentityResolver>,
    pub employees: Arc<EmployeeService>,
}

impl AppState {
    pub fn new(config: &Config, stores: Stores) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            config.access_token_ttl,
        ));
        let hasher = PasswordHasher::from_config(config)?;

        Ok(Self {
            auth: Arc::new(AuthService::new(
                stores.credentials.clone(),
                hasher,
                tokens.clone(),
            )?),
            identity: Arc::new(IdentityResolver::new(tokens, stores.credentials)),
            employees: Arc::new(EmployeeService::new(stores.employees)),
        })
    }
}
