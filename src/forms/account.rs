//! The three forms hosted on the account page.
//!
//! A submission names its form in the `submit` field. [`AccountForm::from_submission`]
//! turns that tag into a variant and reads only the fields belonging to it.

use crate::db::{Store, StoreError};
use crate::forms::rules::{self, FormErrors};
use crate::forms::{Submission, Upload};
use crate::models;
use serde::Serialize;
use serde_valid::Validate;
use std::str::FromStr;
use uuid::Uuid;

pub const USERNAME_ALREADY_TAKEN: &str = "That username is already taken";
pub const IMAGES_ONLY: &str = "Images Only!";
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Discriminator carried in the `submit` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitter {
    UpdateUsername,
    PublishListing,
    UpdatePhoto,
}

impl Submitter {
    pub const ALL: [Submitter; 3] = [
        Submitter::UpdateUsername,
        Submitter::PublishListing,
        Submitter::UpdatePhoto,
    ];

    /// Value of the form's submit button.
    pub fn label(&self) -> &'static str {
        match self {
            Submitter::UpdateUsername => "Update Username",
            Submitter::PublishListing => "Publish your listing",
            Submitter::UpdatePhoto => "Update profile picture",
        }
    }
}

impl FromStr for Submitter {
    type Err = ();

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Submitter::ALL
            .into_iter()
            .find(|submitter| submitter.label() == tag)
            .ok_or(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Validate)]
pub struct UpdateUsernameForm {
    #[validate(min_length = 1, message = "This field is required.")]
    #[validate(max_length = 40, message = "Field must be between 1 and 40 characters long.")]
    pub username: String,
}

impl UpdateUsernameForm {
    /// Field rules plus uniqueness. `current` is the identity's own
    /// username, which it may keep.
    pub async fn check(&self, store: &dyn Store, current: &str) -> Result<FormErrors, StoreError> {
        let mut errors = rules::field_errors(self.validate());

        if !errors.has("username")
            && self.username != current
            && store
                .find_user_by_username(&self.username)
                .await?
                .is_some()
        {
            errors.add("username", USERNAME_ALREADY_TAKEN);
        }

        Ok(errors)
    }
}

/// Choice fields must hold one of the labels in
/// [`models::ROOM_OPTIONS`], [`models::RESTROOM_OPTIONS`] and
/// [`models::PropertyType::ALL`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Validate)]
pub struct PostItemForm {
    #[validate(min_length = 1, message = "This field is required.")]
    pub price: String,
    #[validate(min_length = 1, message = "This field is required.")]
    #[validate(
        enumerate("0 (Studio)+", "1+", "2+", "3+", "4+", "5+"),
        message = "Not a valid choice."
    )]
    pub rooms: String,
    #[validate(min_length = 1, message = "This field is required.")]
    #[validate(enumerate("1+", "2+", "3+", "4+", "5+"), message = "Not a valid choice.")]
    pub restrooms: String,
    #[validate(min_length = 1, message = "This field is required.")]
    #[validate(
        enumerate("Home", "Apartment", "Condo", "Townhome"),
        message = "Not a valid choice."
    )]
    pub property_type: String,
    #[validate(min_length = 1, message = "This field is required.")]
    #[validate(min_length = 5, message = "Field must be between 5 and 1000 characters long.")]
    #[validate(max_length = 1000, message = "Field must be between 5 and 1000 characters long.")]
    pub description: String,
}

impl PostItemForm {
    /// Listing owned by `poster_id`. Call only after [`validate`](Self::validate) passed.
    pub fn to_new_item(&self, poster_id: Uuid) -> Result<models::NewItem, String> {
        Ok(models::NewItem {
            poster_id,
            price: self.price.clone(),
            rooms: self.rooms.clone(),
            restrooms: self.restrooms.clone(),
            property_type: self.property_type.parse()?,
            description: self.description.clone(),
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdatePhotoForm {
    pub photo: Option<Upload>,
}

impl UpdatePhotoForm {
    /// Uploads are not `serde_valid` material: presence and extension only.
    pub fn check(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        match &self.photo {
            Some(upload) if !upload.filename.is_empty() => {
                errors.check(
                    "photo",
                    rules::file_allowed(&upload.filename, &ALLOWED_IMAGE_EXTENSIONS, IMAGES_ONLY),
                );
            }
            _ => errors.add("photo", rules::REQUIRED),
        }
        errors
    }

    /// Stored form of a validated upload.
    pub fn to_photo(&self) -> Option<models::Photo> {
        let upload = self.photo.as_ref()?;
        let content_type = match rules::extension(&upload.filename)?.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            _ => return None,
        };

        Some(models::Photo {
            content_type: content_type.to_string(),
            bytes: upload.bytes.clone(),
        })
    }
}

/// One submitted account-page form, chosen by its [`Submitter`] tag.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountForm {
    UpdateUsername(UpdateUsernameForm),
    PublishListing(PostItemForm),
    UpdatePhoto(UpdatePhotoForm),
}

impl AccountForm {
    /// `None` when the tag is missing or unknown.
    pub fn from_submission(mut submission: Submission) -> Option<Self> {
        let submitter = submission.field("submit").parse::<Submitter>().ok()?;

        let form = match submitter {
            Submitter::UpdateUsername => AccountForm::UpdateUsername(UpdateUsernameForm {
                username: submission.field("username").to_string(),
            }),
            Submitter::PublishListing => AccountForm::PublishListing(PostItemForm {
                price: submission.field("price").to_string(),
                rooms: submission.field("rooms").to_string(),
                restrooms: submission.field("restrooms").to_string(),
                property_type: submission.field("property_type").to_string(),
                description: submission.field("description").to_string(),
            }),
            Submitter::UpdatePhoto => AccountForm::UpdatePhoto(UpdatePhotoForm {
                photo: submission.take_file("photo"),
            }),
        };

        Some(form)
    }

    pub fn submitter(&self) -> Submitter {
        match self {
            AccountForm::UpdateUsername(_) => Submitter::UpdateUsername,
            AccountForm::PublishListing(_) => Submitter::PublishListing,
            AccountForm::UpdatePhoto(_) => Submitter::UpdatePhoto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{PropertyType, RESTROOM_OPTIONS, ROOM_OPTIONS};

    fn listing() -> PostItemForm {
        PostItemForm {
            price: "1500".to_string(),
            rooms: "2+".to_string(),
            restrooms: "1+".to_string(),
            property_type: "Apartment".to_string(),
            description: "Bright two bedroom near campus".to_string(),
        }
    }

    fn upload(filename: &str) -> Upload {
        Upload {
            filename: filename.to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn submitter_tags_round_trip() {
        for submitter in [
            Submitter::UpdateUsername,
            Submitter::PublishListing,
            Submitter::UpdatePhoto,
        ] {
            assert_eq!(submitter.label().parse::<Submitter>(), Ok(submitter));
        }
        assert!("update username".parse::<Submitter>().is_err());
        assert!("".parse::<Submitter>().is_err());
    }

    #[test]
    fn only_the_tagged_form_is_read() {
        let submission = Submission::from_fields([
            ("submit", "Update Username"),
            ("username", "newname"),
            ("description", "ignored"),
            ("price", "ignored"),
        ]);
        assert_eq!(
            AccountForm::from_submission(submission),
            Some(AccountForm::UpdateUsername(UpdateUsernameForm {
                username: "newname".to_string()
            }))
        );

        let submission = Submission::from_fields([
            ("submit", "Publish your listing"),
            ("username", "ignored"),
            ("price", "10"),
        ]);
        match AccountForm::from_submission(submission) {
            Some(AccountForm::PublishListing(form)) => {
                assert_eq!(form.price, "10");
                assert_eq!(form.description, "");
            }
            other => panic!("unexpected form: {other:?}"),
        }
    }

    #[test]
    fn unknown_or_missing_tag_selects_nothing() {
        let submission = Submission::from_fields([("submit", "Delete Account"), ("username", "x")]);
        assert_eq!(AccountForm::from_submission(submission), None);
        assert_eq!(AccountForm::from_submission(Submission::default()), None);
    }

    #[tokio::test]
    async fn username_rules() {
        let store = MemoryStore::new();
        let form = |name: &str| UpdateUsernameForm {
            username: name.to_string(),
        };

        let errors = form("").check(&store, "test").await.unwrap();
        assert_eq!(errors.get("username"), [rules::REQUIRED.to_string()]);

        let errors = form(&"a".repeat(41)).check(&store, "test").await.unwrap();
        assert_eq!(
            errors.get("username"),
            ["Field must be between 1 and 40 characters long.".to_string()]
        );

        let errors = form(&"a".repeat(40)).check(&store, "test").await.unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn username_taken_by_someone_else() {
        let store = MemoryStore::new();
        for (name, email) in [("test", "t1@test.com"), ("test2", "t2@test.com")] {
            store
                .insert_user(models::NewUser {
                    username: name.to_string(),
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
        }

        let taken = UpdateUsernameForm {
            username: "test".to_string(),
        };
        let errors = taken.check(&store, "test2").await.unwrap();
        assert_eq!(errors.get("username"), [USERNAME_ALREADY_TAKEN.to_string()]);

        let own = UpdateUsernameForm {
            username: "test2".to_string(),
        };
        assert!(own.check(&store, "test2").await.unwrap().is_empty());
    }

    #[test]
    fn complete_listing_is_valid() {
        let form = listing();
        assert!(form.validate().is_ok());
        let item = form.to_new_item(Uuid::nil()).unwrap();
        assert_eq!(item.property_type, PropertyType::Apartment);
    }

    #[test]
    fn listing_field_errors() {
        let form = PostItemForm {
            price: String::new(),
            rooms: "7+".to_string(),
            restrooms: String::new(),
            property_type: "Castle".to_string(),
            description: "tiny".to_string(),
        };
        let errors = rules::field_errors(form.validate());
        assert_eq!(errors.get("price"), [rules::REQUIRED.to_string()]);
        assert_eq!(errors.get("rooms"), [rules::INVALID_CHOICE.to_string()]);
        assert_eq!(errors.get("restrooms"), [rules::REQUIRED.to_string()]);
        assert_eq!(errors.get("property_type"), [rules::INVALID_CHOICE.to_string()]);
        assert_eq!(
            errors.get("description"),
            ["Field must be between 5 and 1000 characters long.".to_string()]
        );
    }

    #[test]
    fn photo_must_be_an_image() {
        let form = UpdatePhotoForm {
            photo: Some(upload("avatar.gif")),
        };
        assert_eq!(form.check().get("photo"), [IMAGES_ONLY.to_string()]);

        let form = UpdatePhotoForm {
            photo: Some(upload("avatar.JPG")),
        };
        assert!(form.check().is_empty());
        assert_eq!(form.to_photo().unwrap().content_type, "image/jpeg");
    }

    #[test]
    fn photo_is_required() {
        let missing = UpdatePhotoForm { photo: None };
        assert_eq!(missing.check().get("photo"), [rules::REQUIRED.to_string()]);

        let unnamed = UpdatePhotoForm {
            photo: Some(upload("")),
        };
        assert_eq!(unnamed.check().get("photo"), [rules::REQUIRED.to_string()]);
    }

    #[test]
    fn every_offered_choice_is_accepted() {
        for rooms in ROOM_OPTIONS {
            for restrooms in RESTROOM_OPTIONS {
                for kind in PropertyType::ALL {
                    let form = PostItemForm {
                        rooms: rooms.to_string(),
                        restrooms: restrooms.to_string(),
                        property_type: kind.as_str().to_string(),
                        ..listing()
                    };
                    assert!(form.validate().is_ok(), "{rooms} {restrooms} {kind}");
                }
            }
        }
    }

    #[test]
    fn empty_description_is_only_required() {
        let form = PostItemForm {
            description: String::new(),
            ..listing()
        };
        let errors = rules::field_errors(form.validate());
        assert_eq!(errors.get("description"), [rules::REQUIRED.to_string()]);
    }
}
