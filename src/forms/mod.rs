pub mod account;
mod login;
mod register;
pub mod rules;
mod submission;

pub use account::{AccountForm, PostItemForm, Submitter, UpdatePhotoForm, UpdateUsernameForm};
pub use login::{LoginForm, LOGIN_FAILED};
pub use register::{RegisterForm, EMAIL_TAKEN, USERNAME_TAKEN};
pub use rules::FormErrors;
pub use submission::{Submission, Upload};
