//! Entity store: users, listings and reviews.
//!
//! Handlers only see the [`Store`] trait. Uniqueness of username and email is
//! enforced by every backend; a violated constraint comes back as
//! [`StoreError::Conflict`] rather than a backend-specific error.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field already holds this value (`username` or `email`).
    #[error("{0} is already in use")]
    Conflict(&'static str),
    #[error("record not found")]
    NotFound,
    /// The record breaks a field constraint of its collection.
    #[error("invalid record: {0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some("users_email_idx") => StoreError::Conflict("email"),
                    _ => StoreError::Conflict("username"),
                }
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                StoreError::Invalid(db_err.message().to_string())
            }
            err => StoreError::Database(err.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<models::User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<models::User>, StoreError>;

    async fn list_users(&self) -> Result<Vec<models::User>, StoreError>;

    async fn insert_user(&self, user: models::NewUser) -> Result<models::User, StoreError>;

    async fn update_username(&self, user_id: Uuid, username: &str) -> Result<(), StoreError>;

    /// Overwrites the stored picture whether or not one existed.
    async fn replace_photo(&self, user_id: Uuid, photo: models::Photo) -> Result<(), StoreError>;

    async fn insert_item(&self, item: models::NewItem) -> Result<models::Item, StoreError>;

    async fn list_items(&self) -> Result<Vec<models::Item>, StoreError>;

    async fn list_items_by_poster(&self, poster_id: Uuid)
        -> Result<Vec<models::Item>, StoreError>;

    async fn insert_review(&self, review: models::NewReview)
        -> Result<models::Review, StoreError>;

    async fn list_reviews(&self) -> Result<Vec<models::Review>, StoreError>;
}
