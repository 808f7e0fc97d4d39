//! Applies an account-page submission to the store.

use crate::db::{Store, StoreError};
use crate::forms::{account::USERNAME_ALREADY_TAKEN, rules, AccountForm, FormErrors};
use crate::models;
use serde_valid::Validate;

/// Where a dispatched submission leaves the account page.
#[derive(Debug)]
pub enum Outcome {
    /// The username changed. Sessions bound to the old name no longer
    /// resolve, so the caller must send the user back to log in.
    UsernameChanged,
    /// A listing was created; continue to the listings board.
    ListingPublished(models::Item),
    /// The picture was stored; the account page is shown again.
    PhotoReplaced,
    /// Validation failed and nothing was written.
    Rejected(AccountForm, FormErrors),
}

/// Validates the one submitted form and, when it passes, performs its single write.
#[tracing::instrument(name = "Dispatch account form.", skip(store, user, form), fields(user_id = %user.id, submitter = ?form.submitter()))]
pub async fn dispatch(
    store: &dyn Store,
    user: &models::User,
    form: AccountForm,
) -> Result<Outcome, StoreError> {
    match form {
        AccountForm::UpdateUsername(update) => {
            let mut errors = update.check(store, &user.username).await?;
            if !errors.is_empty() {
                return Ok(Outcome::Rejected(AccountForm::UpdateUsername(update), errors));
            }

            match store.update_username(user.id, &update.username).await {
                Ok(()) => {
                    tracing::info!("Username changed to {:?}", update.username);
                    Ok(Outcome::UsernameChanged)
                }
                // someone claimed the name between the check and the write
                Err(StoreError::Conflict(_)) => {
                    errors.add("username", USERNAME_ALREADY_TAKEN);
                    Ok(Outcome::Rejected(AccountForm::UpdateUsername(update), errors))
                }
                Err(err) => Err(err),
            }
        }
        AccountForm::PublishListing(listing) => {
            let errors = rules::field_errors(listing.validate());
            if !errors.is_empty() {
                return Ok(Outcome::Rejected(AccountForm::PublishListing(listing), errors));
            }

            let new_item = listing.to_new_item(user.id).map_err(StoreError::Invalid)?;
            let item = store.insert_item(new_item).await?;
            tracing::info!("New listing {} has been saved", item.id);
            Ok(Outcome::ListingPublished(item))
        }
        AccountForm::UpdatePhoto(upload) => {
            let errors = upload.check();
            let photo = match upload.to_photo() {
                Some(photo) if errors.is_empty() => photo,
                _ => return Ok(Outcome::Rejected(AccountForm::UpdatePhoto(upload), errors)),
            };

            store.replace_photo(user.id, photo).await?;
            tracing::info!("Profile picture replaced");
            Ok(Outcome::PhotoReplaced)
        }
    }
}
