//! The user directory boundary.
//!
//! Users are owned by a separate subsystem; the claim core only needs
//! lookup by username/id plus creation for the registration endpoint.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use couponhub_core::result::AppResult;
use couponhub_entity::{CreateUser, User};

pub use memory::MemoryUserDirectory;
pub use postgres::PgUserDirectory;

/// User lookup and registration.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Create a new user. A taken username yields a conflict error.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
}
