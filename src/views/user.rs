use crate::helpers::redirect;
use crate::models;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// Entry in the public member list.
#[derive(Debug, Serialize)]
pub struct Member {
    pub username: String,
    pub profile_url: String,
}

impl From<&models::User> for Member {
    fn from(user: &models::User) -> Self {
        Self {
            username: user.username.clone(),
            profile_url: redirect::profile_url(&user.username),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub account_url: String,
    /// `data:` URI of the profile picture.
    pub image: Option<String>,
}

impl From<&models::User> for Profile {
    fn from(user: &models::User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            account_url: redirect::account_url(&user.username),
            image: user.photo.as_ref().map(data_uri),
        }
    }
}

pub fn data_uri(photo: &models::Photo) -> String {
    format!(
        "data:{};base64,{}",
        photo.content_type,
        STANDARD.encode(&photo.bytes)
    )
}
