//! User registration and lookup.

use std::sync::Arc;

use tracing::info;

use couponhub_core::error::AppError;
use couponhub_core::result::AppResult;
use couponhub_database::UserDirectory;
use couponhub_entity::{CreateUser, User};

/// Thin service over the user directory boundary.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User directory.
    users: Arc<dyn UserDirectory>,
}

impl UserService {
    /// Create a new user service.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Register a new user.
    pub async fn register(&self, input: &CreateUser) -> AppResult<User> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }

        let user = self
            .users
            .create(&CreateUser {
                username: username.to_string(),
                display_name: input.display_name.clone(),
            })
            .await?;

        info!(username = %user.username, user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Look up a user by username.
    pub async fn get(&self, username: &str) -> AppResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {username} not found")))
    }
}
