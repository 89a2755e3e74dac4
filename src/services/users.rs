//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password, returning a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid username or password".to_string())
            })?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.user_id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Register a new user account.
    ///
    /// Only one admin account may exist; a second admin registration is
    /// rejected outright.
    pub async fn create_user(&self, payload: CreateUser) -> AppResult<User> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let role = payload.role.unwrap_or(Role::User);
        if role == Role::Admin && !self.repository.users.list_admins().await?.is_empty() {
            return Err(AppError::Conflict(
                "An admin account already exists".to_string(),
            ));
        }

        let hash = self.hash_password(&payload.password)?;
        let user = self
            .repository
            .users
            .create(&payload.username, &hash, role)
            .await?;

        tracing::info!("Created user {} (role {})", user.username, user.role);
        Ok(user)
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Change a user's role, preserving the single-admin invariant.
    pub async fn update_role(&self, id: i32, role: Role) -> AppResult<User> {
        let admins = self.repository.users.list_admins().await?;
        match role {
            Role::Admin => {
                if admins.iter().any(|a| a.user_id != id) {
                    return Err(AppError::Conflict(
                        "An admin account already exists".to_string(),
                    ));
                }
            }
            Role::User => {
                if admins.len() == 1 && admins[0].user_id == id {
                    return Err(AppError::Validation(
                        "Cannot demote the only admin account".to_string(),
                    ));
                }
            }
        }
        self.repository.users.update_role(id, role).await
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        let user = self.repository.users.get_by_id(id).await?;
        if user.role == Role::Admin {
            return Err(AppError::Validation(
                "Cannot delete the admin account".to_string(),
            ));
        }
        self.repository.users.delete(id).await
    }

    /// Startup bootstrap: create the configured admin account when missing
    /// and demote any surplus admins, keeping the earliest one.
    pub async fn ensure_admin_account(&self) -> AppResult<()> {
        let admins = self.repository.users.list_admins().await?;
        if admins.is_empty() {
            if self
                .repository
                .users
                .get_by_username(&self.config.admin_username)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(format!(
                    "Bootstrap admin username {} is taken by a non-admin account",
                    self.config.admin_username
                )));
            }
            let hash = self.hash_password(&self.config.admin_password)?;
            self.repository
                .users
                .create(&self.config.admin_username, &hash, Role::Admin)
                .await?;
            tracing::info!("Bootstrapped admin account {}", self.config.admin_username);
            return Ok(());
        }

        for extra in admins.iter().skip(1) {
            tracing::warn!(
                "Multiple admin accounts detected, demoting {} to user",
                extra.username
            );
            self.repository
                .users
                .update_role(extra.user_id, Role::User)
                .await?;
        }
        Ok(())
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
