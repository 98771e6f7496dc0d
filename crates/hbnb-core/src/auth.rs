use std::sync::LazyLock;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::password::{hash_password, verify_password};
use crate::token::TokenIssuer;
use crate::traits::UserStore;

/// Audit log target for authentication outcomes. Never carries emails or passwords.
pub const AUDIT_TARGET: &str = "hbnb::audit";

/// Plaintext registration input, validated and hashed by [`AuthService::register`].
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Registration {
    /// Check the fields and hash the password.
    ///
    /// The email is trimmed and must contain `@`; the password must be non-empty.
    pub fn into_new_user(self) -> Result<NewUser, AppError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Missing email".into()));
        }
        if !email.contains('@') {
            return Err(AppError::Validation("Invalid email".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("Missing password".into()));
        }

        Ok(NewUser {
            email: email.to_string(),
            password_hash: hash_password(&self.password)?,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

/// Stand-in hash verified when no account matches the login email.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("hbnb-unknown-account").ok());

/// The hash a login attempt is checked against: the account's own, or the
/// stand-in when there is no account.
fn credential_hash(user: Option<&User>) -> Result<&str, AppError> {
    match user {
        Some(user) => Ok(&user.password_hash),
        None => UNKNOWN_ACCOUNT_HASH
            .as_deref()
            .ok_or_else(|| AppError::PasswordHash("stand-in hash unavailable".into())),
    }
}

/// Credential checks, token issuance, and current-user resolution.
pub struct AuthService<S: UserStore> {
    store: S,
    tokens: TokenIssuer,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(store: S, tokens: TokenIssuer) -> Self {
        LazyLock::force(&UNKNOWN_ACCOUNT_HASH);
        Self { store, tokens }
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown email and wrong password both yield
    /// [`AppError::InvalidCredentials`] so callers cannot tell them apart. Both
    /// paths run one argon2 verification, so response time does not reveal
    /// whether an email is registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = email.trim();
        if email.is_empty() {
            tracing::warn!(target: AUDIT_TARGET, "login rejected: empty identifier");
            return Err(AppError::InvalidCredentials);
        }

        let user = self.store.find_user_by_email(email).await?;
        let valid = verify_password(password, credential_hash(user.as_ref())?)?;

        match user {
            Some(user) if valid => {
                let token = self.tokens.issue(user.id)?;
                tracing::info!(target: AUDIT_TARGET, user_id = %user.id, "login succeeded");
                Ok(token)
            }
            Some(user) => {
                tracing::warn!(target: AUDIT_TARGET, user_id = %user.id, "login rejected");
                Err(AppError::InvalidCredentials)
            }
            None => {
                tracing::warn!(target: AUDIT_TARGET, "login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Resolve the identity embedded in a verified token.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Validate and store a new account.
    pub async fn register(&self, registration: Registration) -> Result<User, AppError> {
        let user = self
            .store
            .create_user(&registration.into_new_user()?)
            .await?;
        tracing::info!(target: AUDIT_TARGET, user_id = %user.id, "user registered");
        Ok(user)
    }
}
