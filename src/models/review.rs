use chrono::{DateTime, Utc};
use serde_valid::Validate;
use uuid::Uuid;

/// Movie review, joined with the commenter's current username.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub commenter_id: Uuid,
    pub commenter_username: String,
    pub content: String,
    pub imdb_id: String,
    pub movie_title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Validate)]
pub struct NewReview {
    pub commenter_id: Uuid,
    #[validate(min_length = 5)]
    #[validate(max_length = 500)]
    pub content: String,
    #[validate(min_length = 9)]
    #[validate(max_length = 9)]
    pub imdb_id: String,
    #[validate(min_length = 1)]
    #[validate(max_length = 100)]
    pub movie_title: String,
}
