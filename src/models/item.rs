use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_valid::Validate;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const ROOM_OPTIONS: [&str; 6] = ["0 (Studio)+", "1+", "2+", "3+", "4+", "5+"];
pub const RESTROOM_OPTIONS: [&str; 5] = ["1+", "2+", "3+", "4+", "5+"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyType {
    Home,
    Apartment,
    Condo,
    Townhome,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Home,
        PropertyType::Apartment,
        PropertyType::Condo,
        PropertyType::Townhome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Home => "Home",
            PropertyType::Apartment => "Apartment",
            PropertyType::Condo => "Condo",
            PropertyType::Townhome => "Townhome",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("unknown property type: {value}"))
    }
}

/// A listing as read back from the store, joined with the poster's current username.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub poster_id: Uuid,
    pub poster_username: String,
    pub price: String,
    pub rooms: String,
    pub restrooms: String,
    pub property_type: PropertyType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Collection constraints; PostgreSQL mirrors them with CHECK constraints.
#[derive(Debug, Clone, Validate)]
pub struct NewItem {
    pub poster_id: Uuid,
    pub price: String,
    pub rooms: String,
    pub restrooms: String,
    pub property_type: PropertyType,
    #[validate(min_length = 5)]
    #[validate(max_length = 1000)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_parses_its_own_labels() {
        for kind in PropertyType::ALL {
            assert_eq!(kind.as_str().parse::<PropertyType>(), Ok(kind));
        }
    }

    #[test]
    fn property_type_rejects_unknown_and_miscased_labels() {
        assert!("Castle".parse::<PropertyType>().is_err());
        assert!("condo".parse::<PropertyType>().is_err());
    }

    #[test]
    fn description_length_is_bounded() {
        let item = |description: &str| NewItem {
            poster_id: Uuid::nil(),
            price: "100".to_string(),
            rooms: "1+".to_string(),
            restrooms: "1+".to_string(),
            property_type: PropertyType::Home,
            description: description.to_string(),
        };

        assert!(item("tiny").validate().is_err());
        assert!(item("roomy").validate().is_ok());
        assert!(item(&"x".repeat(1000)).validate().is_ok());
        assert!(item(&"x".repeat(1001)).validate().is_err());
    }
}
