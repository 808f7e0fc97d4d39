use crate::models;
use crate::views::DATE_FORMAT;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Review {
    pub commenter: String,
    pub movie_title: String,
    pub imdb_id: String,
    pub content: String,
    pub date: String,
}

impl From<models::Review> for Review {
    fn from(review: models::Review) -> Self {
        Self {
            commenter: review.commenter_username,
            movie_title: review.movie_title,
            imdb_id: review.imdb_id,
            content: review.content,
            date: review.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}
