//! Sign-up and credential checks.

use std::sync::Arc;

use crate::domain::User;
use crate::error::DomainError;
use crate::forms::SignupForm;
use crate::ports::{PasswordService, UserRepository};

/// Account service.
#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl Accounts {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn signup(&self, form: SignupForm) -> Result<User, DomainError> {
        let clean = form.clean().map_err(DomainError::Form)?;

        if self.users.find_by_username(&clean.username).await?.is_some() {
            return Err(DomainError::Duplicate(
                "A user with that username already exists.".to_string(),
            ));
        }

        let password_hash = self
            .passwords
            .hash(&clean.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .insert(User::new(clean.username, clean.email, password_hash))
            .await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Create a staff account, or promote and re-password an existing one.
    pub async fn ensure_superuser(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = match self.users.find_by_username(username).await? {
            Some(existing) => {
                let user = User {
                    password_hash,
                    is_staff: true,
                    updated_at: chrono::Utc::now(),
                    ..existing
                };
                self.users.update(user).await?
            }
            None => {
                let user = User::new(username.to_string(), email.to_string(), password_hash).staff();
                self.users.insert(user).await?
            }
        };
        tracing::info!(user_id = %user.id, username = %user.username, "Superuser ready");
        Ok(user)
    }

    /// Check a username/password pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(username = %user.username, "Rejected login");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }
}
