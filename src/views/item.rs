use crate::helpers::redirect;
use crate::models;
use crate::views::DATE_FORMAT;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Listing {
    pub poster: String,
    pub poster_url: String,
    pub price: String,
    pub rooms: String,
    pub restrooms: String,
    pub property_type: models::PropertyType,
    pub description: String,
    pub date: String,
}

impl From<models::Item> for Listing {
    fn from(item: models::Item) -> Self {
        Self {
            poster_url: redirect::profile_url(&item.poster_username),
            poster: item.poster_username,
            price: item.price,
            rooms: item.rooms,
            restrooms: item.restrooms,
            property_type: item.property_type,
            description: item.description,
            date: item.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}
