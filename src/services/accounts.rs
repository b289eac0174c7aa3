//! Account directory: registration, authentication and lookups

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::BootstrapConfig,
    error::{AppError, AppResult},
    models::account::{Account, RegisterAccount, Role},
    repository::Repository,
};

/// Demo member seeded along with the sample catalog
pub const DEMO_USERNAME: &str = "user1";
pub const DEMO_PASSWORD: &str = "user123";
const DEMO_EMAIL: &str = "user1@example.com";

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
}

impl AccountsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new member account
    pub async fn register(&self, request: RegisterAccount) -> AppResult<Account> {
        request.validate()?;

        let hash = hash_password(&request.credential)?;
        let account = self
            .repository
            .accounts
            .create(&request.username, &hash, request.email.as_deref(), Role::Member)
            .await
            .map_err(|e| {
                if let AppError::DuplicateUsername(ref name) = e {
                    tracing::warn!("Registration rejected: username '{}' taken", name);
                }
                e
            })?;

        tracing::info!("Registered account id={} username={}", account.id, account.username);
        Ok(account)
    }

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, credential: &str) -> AppResult<Account> {
        let account = self
            .repository
            .accounts
            .get_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&account.credential, credential)? {
            tracing::warn!("Failed login for username={}", username);
            return Err(AppError::InvalidCredentials);
        }

        Ok(account)
    }

    pub async fn get(&self, account_id: i32) -> AppResult<Account> {
        self.repository.accounts.get_by_id(account_id).await
    }

    /// Create the configured administrator unless an account with that username exists.
    ///
    /// An existing account under that username must hold the admin role; a
    /// member account there is reported as a taken username.
    pub async fn ensure_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<Account> {
        if let Some(existing) = self
            .repository
            .accounts
            .get_by_username(&bootstrap.admin_username)
            .await?
        {
            if !existing.is_admin() {
                tracing::warn!(
                    "Bootstrap: account '{}' exists with role '{}', expected '{}'",
                    existing.username,
                    existing.role.as_str(),
                    Role::Admin.as_str()
                );
                return Err(AppError::DuplicateUsername(existing.username));
            }
            return Ok(existing);
        }

        let request = RegisterAccount::new(
            bootstrap.admin_username.clone(),
            bootstrap.admin_password.clone(),
            bootstrap.admin_email.as_deref(),
        );
        request.validate()?;

        let hash = hash_password(&request.credential)?;
        let account = self
            .repository
            .accounts
            .create(&request.username, &hash, request.email.as_deref(), Role::Admin)
            .await?;

        tracing::info!("Created administrator account '{}'", account.username);
        Ok(account)
    }

    /// Register the demo member unless its username is already taken
    pub async fn ensure_demo_member(&self) -> AppResult<Option<Account>> {
        if self
            .repository
            .accounts
            .get_by_username(DEMO_USERNAME)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let account = self
            .register(RegisterAccount::new(DEMO_USERNAME, DEMO_PASSWORD, Some(DEMO_EMAIL)))
            .await?;
        Ok(Some(account))
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
