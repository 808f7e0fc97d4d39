use crate::configuration::Settings;
use crate::db::{Store, StoreError};
use crate::errors::AppError;
use crate::forms::{FormErrors, RegisterForm, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::helpers::{password, redirect};
use crate::middleware::authentication::Identity;
use crate::views::{self, Templates};
use actix_web::{get, post, web, HttpResponse, Result};
use std::sync::Arc;

fn render(
    templates: &Templates,
    form: &RegisterForm,
    errors: &FormErrors,
) -> Result<HttpResponse, AppError> {
    let mut context = views::page_context("Register", None);
    context.insert("form", form);
    context.insert("errors", errors);
    Ok(views::html(templates.render("register.html", &context)?))
}

#[tracing::instrument(name = "Registration page.", skip_all)]
#[get("/register")]
pub async fn register_page_handler(
    identity: Option<Identity>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    if identity.is_some() {
        return Ok(redirect::found("/").finish());
    }
    render(&templates, &RegisterForm::default(), &FormErrors::new())
}

#[tracing::instrument(name = "Register a new user.", skip_all, fields(username = %form.username))]
#[post("/register")]
pub async fn register_handler(
    identity: Option<Identity>,
    form: web::Form<RegisterForm>,
    store: web::Data<Arc<dyn Store>>,
    settings: web::Data<Settings>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    if identity.is_some() {
        return Ok(redirect::found("/").finish());
    }

    let form = form.into_inner();
    let mut errors = form.check(&***store).await?;
    if !errors.is_empty() {
        return render(&templates, &form, &errors);
    }

    let password_hash =
        password::hash(form.password.clone(), settings.password_hash_cost).await?;
    match store.insert_user(form.clone().into_new_user(password_hash)).await {
        Ok(user) => {
            tracing::info!("User {} has been registered", user.id);
            Ok(redirect::found("/login").finish())
        }
        Err(StoreError::Conflict(field)) => {
            // lost a race with a concurrent registration
            match field {
                "email" => errors.add("email", EMAIL_TAKEN),
                _ => errors.add("username", USERNAME_TAKEN),
            }
            render(&templates, &form, &errors)
        }
        Err(err) => Err(err.into()),
    }
}
