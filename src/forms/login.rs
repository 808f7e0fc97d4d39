use serde::{Deserialize, Serialize};
use serde_valid::Validate;

pub const LOGIN_FAILED: &str = "Login failed. Check your username and/or password";

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(min_length = 1, message = "This field is required.")]
    pub username: String,
    #[validate(min_length = 1, message = "This field is required.")]
    #[serde(skip_serializing)]
    pub password: String,
}
