use crate::db::{Store, StoreError};
use crate::forms::rules::{self, FormErrors};
use crate::models;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

pub const USERNAME_TAKEN: &str = "Username is taken";
pub const EMAIL_TAKEN: &str = "Email is taken";

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(min_length = 1, message = "This field is required.")]
    #[validate(max_length = 40, message = "Field must be between 1 and 40 characters long.")]
    pub username: String,
    #[validate(min_length = 1, message = "This field is required.")]
    #[validate(pattern = r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$", message = "Invalid email address.")]
    pub email: String,
    #[validate(min_length = 1, message = "This field is required.")]
    #[serde(skip_serializing)]
    pub password: String,
    #[validate(min_length = 1, message = "This field is required.")]
    #[serde(skip_serializing)]
    pub confirm_password: String,
}

impl RegisterForm {
    /// Field rules plus the checks that need the store or another field.
    pub async fn check(&self, store: &dyn Store) -> Result<FormErrors, StoreError> {
        let mut errors = rules::field_errors(self.validate());

        if !errors.has("username")
            && store
                .find_user_by_username(&self.username)
                .await?
                .is_some()
        {
            errors.add("username", USERNAME_TAKEN);
        }

        if !errors.has("email") && store.find_user_by_email(&self.email).await?.is_some() {
            errors.add("email", EMAIL_TAKEN);
        }

        if !errors.has("confirm_password") {
            errors.check(
                "confirm_password",
                rules::equal_to(&self.confirm_password, &self.password, "password"),
            );
        }

        Ok(errors)
    }

    pub fn into_new_user(self, password_hash: String) -> models::NewUser {
        models::NewUser {
            username: self.username,
            email: self.email,
            password_hash,
        }
    }
}
