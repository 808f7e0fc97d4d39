use super::{Store, StoreError};
use crate::models;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::Instrument;
use serde_valid::Validate;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, photo, photo_content_type, created_at";

const ITEM_SELECT: &str = r#"
    SELECT i.id, i.poster_id, u.username AS poster_username, i.price, i.rooms,
           i.restrooms, i.property_type, i.description, i.created_at
    FROM item i
    JOIN users u ON u.id = i.poster_id
"#;

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.commenter_id, u.username AS commenter_username, r.content,
           r.imdb_id, r.movie_title, r.created_at
    FROM review r
    JOIN users u ON u.id = r.commenter_id
"#;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user_by(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<models::User>, StoreError> {
        let query_span = tracing::info_span!("Fetch user.", column);
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} = $1 LIMIT 1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await
        .map(|row| row.map(Into::into))
        .map_err(|err| {
            tracing::error!("Failed to fetch user by {}: {:?}", column, err);
            err.into()
        })
    }

    async fn fetch_item(&self, id: Uuid) -> Result<models::Item, StoreError> {
        sqlx::query_as::<_, ItemRow>(&format!("{ITEM_SELECT} WHERE i.id = $1"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)
            .and_then(models::Item::try_from)
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    photo: Option<Vec<u8>>,
    photo_content_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for models::User {
    fn from(row: UserRow) -> Self {
        let photo = match (row.photo, row.photo_content_type) {
            (Some(bytes), Some(content_type)) => Some(models::Photo {
                content_type,
                bytes,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            photo,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    poster_id: Uuid,
    poster_username: String,
    price: String,
    rooms: String,
    restrooms: String,
    property_type: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for models::Item {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            poster_id: row.poster_id,
            poster_username: row.poster_username,
            price: row.price,
            rooms: row.rooms,
            restrooms: row.restrooms,
            property_type: row.property_type.parse().map_err(StoreError::Invalid)?,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    commenter_id: Uuid,
    commenter_username: String,
    content: String,
    imdb_id: String,
    movie_title: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for models::Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            commenter_id: row.commenter_id,
            commenter_username: row.commenter_username,
            content: row.content,
            imdb_id: row.imdb_id,
            movie_title: row.movie_title,
            created_at: row.created_at,
        }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<models::User>, StoreError> {
        self.find_user_by("username", username).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<models::User>, StoreError> {
        self.find_user_by("email", email).await
    }

    async fn list_users(&self) -> Result<Vec<models::User>, StoreError> {
        let query_span = tracing::info_span!("Fetch all users.");
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|err| {
            tracing::error!("Failed to fetch users: {:?}", err);
            err.into()
        })
    }

    async fn insert_user(&self, user: models::NewUser) -> Result<models::User, StoreError> {
        let query_span = tracing::info_span!("Saving new user into the database.");
        let user = user.into_user();
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to insert user: {:?}", err);
            StoreError::from(err)
        })?;

        Ok(user)
    }

    async fn update_username(&self, user_id: Uuid, username: &str) -> Result<(), StoreError> {
        let query_span = tracing::info_span!("Updating username.");
        let result = sqlx::query("UPDATE users SET username = $2 WHERE id = $1")
            .bind(user_id)
            .bind(username)
            .execute(&self.pool)
            .instrument(query_span)
            .await
            .map_err(|err| {
                tracing::error!("Failed to update username: {:?}", err);
                StoreError::from(err)
            })?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn replace_photo(&self, user_id: Uuid, photo: models::Photo) -> Result<(), StoreError> {
        let query_span = tracing::info_span!("Replacing profile picture.");
        let result = sqlx::query(
            "UPDATE users SET photo = $2, photo_content_type = $3 WHERE id = $1",
        )
        .bind(user_id)
        .bind(photo.bytes)
        .bind(photo.content_type)
        .execute(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to replace photo: {:?}", err);
            StoreError::from(err)
        })?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn insert_item(&self, item: models::NewItem) -> Result<models::Item, StoreError> {
        item
            .validate()
            .map_err(|errors| StoreError::Invalid(errors.to_string()))?;

        let query_span = tracing::info_span!("Saving new listing into the database.");
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO item (id, poster_id, price, rooms, restrooms, property_type, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            "#,
        )
        .bind(id)
        .bind(item.poster_id)
        .bind(&item.price)
        .bind(&item.rooms)
        .bind(&item.restrooms)
        .bind(item.property_type.as_str())
        .bind(&item.description)
        .execute(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::NotFound
            }
            err => {
                tracing::error!("Failed to insert listing: {:?}", err);
                StoreError::from(err)
            }
        })?;

        self.fetch_item(id).await
    }

    async fn list_items(&self) -> Result<Vec<models::Item>, StoreError> {
        let query_span = tracing::info_span!("Fetch all listings.");
        sqlx::query_as::<_, ItemRow>(&format!("{ITEM_SELECT} ORDER BY i.created_at DESC"))
            .fetch_all(&self.pool)
            .instrument(query_span)
            .await
            .map_err(|err| {
                tracing::error!("Failed to fetch listings: {:?}", err);
                StoreError::from(err)
            })?
            .into_iter()
            .map(models::Item::try_from)
            .collect()
    }

    async fn list_items_by_poster(
        &self,
        poster_id: Uuid,
    ) -> Result<Vec<models::Item>, StoreError> {
        let query_span = tracing::info_span!("Fetch listings by poster.");
        sqlx::query_as::<_, ItemRow>(&format!(
            "{ITEM_SELECT} WHERE i.poster_id = $1 ORDER BY i.created_at DESC"
        ))
        .bind(poster_id)
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch listings of {}: {:?}", poster_id, err);
            StoreError::from(err)
        })?
        .into_iter()
        .map(models::Item::try_from)
        .collect()
    }

    async fn insert_review(
        &self,
        review: models::NewReview,
    ) -> Result<models::Review, StoreError> {
        review
            .validate()
            .map_err(|errors| StoreError::Invalid(errors.to_string()))?;

        let query_span = tracing::info_span!("Saving new review into the database.");
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO review (id, commenter_id, content, imdb_id, movie_title, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            "#,
        )
        .bind(id)
        .bind(review.commenter_id)
        .bind(&review.content)
        .bind(&review.imdb_id)
        .bind(&review.movie_title)
        .execute(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::NotFound
            }
            err => {
                tracing::error!("Failed to insert review: {:?}", err);
                StoreError::from(err)
            }
        })?;

        sqlx::query_as::<_, ReviewRow>(&format!("{REVIEW_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(StoreError::from)
    }

    async fn list_reviews(&self) -> Result<Vec<models::Review>, StoreError> {
        let query_span = tracing::info_span!("Fetch all reviews.");
        sqlx::query_as::<_, ReviewRow>(&format!("{REVIEW_SELECT} ORDER BY r.created_at DESC"))
            .fetch_all(&self.pool)
            .instrument(query_span)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(|err| {
                tracing::error!("Failed to fetch reviews: {:?}", err);
                err.into()
            })
    }
}
