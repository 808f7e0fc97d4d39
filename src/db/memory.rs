use super::{Store, StoreError};
use crate::models;
use chrono::Utc;
use tokio::sync::RwLock;
use serde_valid::Validate;
use uuid::Uuid;

/// In-process store. Uniqueness is checked under the write lock, so the
/// check and the write cannot interleave with another request.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    users: Vec<models::User>,
    items: Vec<ItemRecord>,
    reviews: Vec<ReviewRecord>,
}

struct ItemRecord {
    id: Uuid,
    created_at: chrono::DateTime<Utc>,
    item: models::NewItem,
}

struct ReviewRecord {
    id: Uuid,
    created_at: chrono::DateTime<Utc>,
    review: models::NewReview,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State {
    fn username_of(&self, user_id: Uuid) -> Result<String, StoreError> {
        self.users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.username.clone())
            .ok_or(StoreError::NotFound)
    }

    fn user_mut(&mut self, user_id: Uuid) -> Result<&mut models::User, StoreError> {
        self.users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(StoreError::NotFound)
    }

    fn item(&self, record: &ItemRecord) -> Result<models::Item, StoreError> {
        Ok(models::Item {
            id: record.id,
            poster_id: record.item.poster_id,
            poster_username: self.username_of(record.item.poster_id)?,
            price: record.item.price.clone(),
            rooms: record.item.rooms.clone(),
            restrooms: record.item.restrooms.clone(),
            property_type: record.item.property_type,
            description: record.item.description.clone(),
            created_at: record.created_at,
        })
    }

    fn review(&self, record: &ReviewRecord) -> Result<models::Review, StoreError> {
        Ok(models::Review {
            id: record.id,
            commenter_id: record.review.commenter_id,
            commenter_username: self.username_of(record.review.commenter_id)?,
            content: record.review.content.clone(),
            imdb_id: record.review.imdb_id.clone(),
            movie_title: record.review.movie_title.clone(),
            created_at: record.created_at,
        })
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<models::User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<models::User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|user| user.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<models::User>, StoreError> {
        Ok(self.state.read().await.users.clone())
    }

    async fn insert_user(&self, user: models::NewUser) -> Result<models::User, StoreError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("username"));
        }
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email"));
        }

        let user = user.into_user();
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_username(&self, user_id: Uuid, username: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state
            .users
            .iter()
            .any(|u| u.username == username && u.id != user_id)
        {
            return Err(StoreError::Conflict("username"));
        }

        state.user_mut(user_id)?.username = username.to_string();
        Ok(())
    }

    async fn replace_photo(&self, user_id: Uuid, photo: models::Photo) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.user_mut(user_id)?.photo = Some(photo);
        Ok(())
    }

    async fn insert_item(&self, item: models::NewItem) -> Result<models::Item, StoreError> {
        item
            .validate()
            .map_err(|errors| StoreError::Invalid(errors.to_string()))?;

        let mut state = self.state.write().await;
        state.username_of(item.poster_id)?;

        let record = ItemRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            item,
        };
        let item = state.item(&record)?;
        state.items.push(record);
        Ok(item)
    }

    async fn list_items(&self) -> Result<Vec<models::Item>, StoreError> {
        let state = self.state.read().await;
        state
            .items
            .iter()
            .rev()
            .map(|record| state.item(record))
            .collect()
    }

    async fn list_items_by_poster(
        &self,
        poster_id: Uuid,
    ) -> Result<Vec<models::Item>, StoreError> {
        let state = self.state.read().await;
        state
            .items
            .iter()
            .rev()
            .filter(|record| record.item.poster_id == poster_id)
            .map(|record| state.item(record))
            .collect()
    }

    async fn insert_review(
        &self,
        review: models::NewReview,
    ) -> Result<models::Review, StoreError> {
        review
            .validate()
            .map_err(|errors| StoreError::Invalid(errors.to_string()))?;

        let mut state = self.state.write().await;
        state.username_of(review.commenter_id)?;

        let record = ReviewRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            review,
        };
        let review = state.review(&record)?;
        state.reviews.push(record);
        Ok(review)
    }

    async fn list_reviews(&self) -> Result<Vec<models::Review>, StoreError> {
        let state = self.state.read().await;
        state
            .reviews
            .iter()
            .rev()
            .map(|record| state.review(record))
            .collect()
    }
}
