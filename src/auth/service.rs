use actix_web::web;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::jwt::{IssuedToken, TokenService};
use crate::auth::password::PasswordHasher;
use crate::error::AppError;
use crate::model::user::UserId;
use crate::store::CredentialStore;

pub const MAX_USERNAME_LEN: usize = 50;

/// Outcome of a successful signup or signin.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub token: IssuedToken,
}

/// Signup, signin and password reset over the credential store.
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    // verified against when the user is unknown, so both failure paths cost the same
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash("dummy password for unknown users")?;

        Ok(Self {
            credentials,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let username = validate_username(username)?;
        require(password, "Password is required")?;

        if self.credentials.exists(username).await? {
            info!("Signup rejected: username taken");
            return Err(AppError::DuplicateUsername);
        }

        let hashed = self.hash(password).await?;
        // the unique constraint settles any race with a concurrent signup
        let user_id = self.credentials.create(username, &hashed).await?;
        info!(user_id, "User registered");

        self.session(user_id, username)
    }

    pub async fn signin(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let username = username.trim();
        require(username, "Username is required")?;
        require(password, "Password is required")?;

        let Some(user) = self.credentials.find_by_username(username).await? else {
            self.verify(password, &self.dummy_hash).await?;
            info!("Invalid credentials: user not found");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify(password, &user.password_hash).await? {
            info!(user_id = user.id, "Invalid credentials: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        debug!(user_id = user.id, "Password verified");
        self.session(user.id, &user.username)
    }

    /// Overwrites the password hash. Previously issued tokens stay valid.
    pub async fn reset_password(&self, username: &str, new_password: &str) -> Result<(), AppError> {
        let username = username.trim();
        require(username, "Username is required")?;
        require(new_password, "New password is required")?;

        let user = self
            .credentials
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let hashed = self.hash(new_password).await?;
        self.credentials.update_password_hash(user.id, &hashed).await?;
        info!(user_id = user.id, "Password reset");
        Ok(())
    }

    fn session(&self, user_id: UserId, username: &str) -> Result<Session, AppError> {
        let token = self.tokens.issue(username)?;
        Ok(Session {
            user_id,
            username: username.to_string(),
            token,
        })
    }

    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        run_blocking(move || hasher.hash(&password)).await
    }

    async fn verify(&self, password: &str, hashed: &str) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hashed = hashed.to_string();
        run_blocking(move || hasher.verify(&password, &hashed)).await
    }
}

/// Argon2 is deliberately slow; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))?
}

fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<&str, AppError> {
    let username = username.trim();
    require(username, "Username is required")?;

    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(username)
}
