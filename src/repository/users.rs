//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{Role, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::UserNotFound(format!("User with id {} not found", id)))
    }

    /// Get user by username (primary authentication method)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// List all users, oldest accounts first
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Insert a new user with a pre-hashed password
    pub async fn create(&self, username: &str, password_hash: &str, role: Role) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Username {} already exists", username))
            }
            _ => AppError::Database(e),
        })?;

        Ok(user)
    }

    /// Change a user's role
    pub async fn update_role(&self, id: i32, role: Role) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2 WHERE user_id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::UserNotFound(format!("User with id {} not found", id)))
    }

    /// Delete a user (shelf entries cascade)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    /// All admin accounts, oldest first
    pub async fn list_admins(&self) -> AppResult<Vec<User>> {
        let admins = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'admin' ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(admins)
    }
}
