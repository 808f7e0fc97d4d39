use crate::configuration::Settings;
use crate::db::Store;
use crate::errors::AppError;
use crate::forms::{
    AccountForm, FormErrors, PostItemForm, Submission, Submitter, UpdateUsernameForm,
};
use crate::helpers::redirect;
use crate::middleware::authentication::{session, Identity};
use crate::models::{self, PropertyType, RESTROOM_OPTIONS, ROOM_OPTIONS};
use crate::services::{self, Outcome};
use crate::views::{self, user::Profile, Templates};
use actix_web::{get, post, web, HttpResponse, Result};
use std::sync::Arc;

/// Account page state. Only the form that was submitted carries the
/// caller's input and errors; the others start fresh.
struct AccountPage {
    username_form: UpdateUsernameForm,
    username_errors: FormErrors,
    listing_form: PostItemForm,
    listing_errors: FormErrors,
    photo_errors: FormErrors,
}

impl AccountPage {
    fn fresh(user: &models::User) -> Self {
        Self {
            username_form: UpdateUsernameForm {
                username: user.username.clone(),
            },
            username_errors: FormErrors::new(),
            listing_form: PostItemForm::default(),
            listing_errors: FormErrors::new(),
            photo_errors: FormErrors::new(),
        }
    }

    fn rejected(user: &models::User, form: AccountForm, errors: FormErrors) -> Self {
        let mut page = Self::fresh(user);
        match form {
            AccountForm::UpdateUsername(form) => {
                page.username_form = form;
                page.username_errors = errors;
            }
            AccountForm::PublishListing(form) => {
                page.listing_form = form;
                page.listing_errors = errors;
            }
            AccountForm::UpdatePhoto(_) => page.photo_errors = errors,
        }
        page
    }

    fn render(&self, templates: &Templates, user: &models::User) -> Result<HttpResponse, AppError> {
        let property_types = PropertyType::ALL.map(|kind| kind.as_str());

        let mut context = views::page_context("Account", Some(user));
        context.insert("profile", &Profile::from(user));
        context.insert("username_form", &self.username_form);
        context.insert("username_errors", &self.username_errors);
        context.insert("listing_form", &self.listing_form);
        context.insert("listing_errors", &self.listing_errors);
        context.insert("photo_errors", &self.photo_errors);
        context.insert("room_options", &ROOM_OPTIONS);
        context.insert("restroom_options", &RESTROOM_OPTIONS);
        context.insert("property_types", &property_types);
        context.insert("update_username_label", Submitter::UpdateUsername.label());
        context.insert("publish_listing_label", Submitter::PublishListing.label());
        context.insert("update_photo_label", Submitter::UpdatePhoto.label());

        Ok(views::html(templates.render("account.html", &context)?))
    }
}

#[get("/account")]
pub async fn own_account_handler(identity: Identity) -> HttpResponse {
    redirect::found(&redirect::account_url(&identity.username)).finish()
}

#[tracing::instrument(name = "Account page.", skip(identity, templates), fields(user_id = %identity.id))]
#[get("/account/{username}")]
pub async fn account_page_handler(
    path: web::Path<(String,)>,
    identity: Identity,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner().0;
    if username != identity.username {
        return Ok(redirect::found(&redirect::account_url(&identity.username)).finish());
    }

    AccountPage::fresh(identity.user()).render(&templates, identity.user())
}

#[tracing::instrument(name = "Account form submission.", skip(identity, submission, store, settings, templates), fields(user_id = %identity.id))]
#[post("/account/{username}")]
pub async fn account_submit_handler(
    path: web::Path<(String,)>,
    identity: Identity,
    submission: Submission,
    store: web::Data<Arc<dyn Store>>,
    settings: web::Data<Settings>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner().0;
    if username != identity.username {
        return Ok(redirect::found(&redirect::account_url(&identity.username)).finish());
    }

    let user = identity.user();
    let form = match AccountForm::from_submission(submission) {
        Some(form) => form,
        None => {
            tracing::debug!("Submission names no known form");
            return AccountPage::fresh(user).render(&templates, user);
        }
    };

    match services::dispatch(&***store, user, form).await? {
        Outcome::UsernameChanged => Ok(redirect::found("/login")
            .cookie(session::clear(&settings.session))
            .finish()),
        Outcome::ListingPublished(_) => Ok(redirect::found("/").finish()),
        Outcome::PhotoReplaced => {
            let user = store
                .find_user_by_username(&user.username)
                .await?
                .ok_or(AppError::NotFound)?;
            AccountPage::fresh(&user).render(&templates, &user)
        }
        Outcome::Rejected(form, errors) => {
            AccountPage::rejected(user, form, errors).render(&templates, user)
        }
    }
}
