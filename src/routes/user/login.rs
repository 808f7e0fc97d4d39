use crate::configuration::Settings;
use crate::db::Store;
use crate::errors::AppError;
use crate::forms::{FormErrors, LoginForm, LOGIN_FAILED};
use crate::helpers::{flash, password, redirect};
use crate::middleware::authentication::{session, Identity};
use crate::views::{self, Templates};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Result};
use serde_valid::Validate;
use std::sync::Arc;

fn render_page(
    templates: &Templates,
    form: &LoginForm,
    errors: &FormErrors,
    message: Option<&str>,
) -> Result<String, AppError> {
    let mut context = views::page_context("Login", None);
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("flash", &message);
    templates.render("login.html", &context)
}

#[tracing::instrument(name = "Login page.", skip_all)]
#[get("/login")]
pub async fn login_page_handler(
    req: HttpRequest,
    identity: Option<Identity>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    if identity.is_some() {
        return Ok(redirect::found("/").finish());
    }

    let message = flash::take(&req);
    let body = render_page(
        &templates,
        &LoginForm::default(),
        &FormErrors::new(),
        message.as_deref(),
    )?;

    let mut response = HttpResponse::Ok();
    if message.is_some() {
        response.cookie(flash::consumed());
    }
    Ok(response.content_type("text/html; charset=utf-8").body(body))
}

#[tracing::instrument(name = "Log in.", skip_all, fields(username = %form.username))]
#[post("/login")]
pub async fn login_handler(
    identity: Option<Identity>,
    form: web::Form<LoginForm>,
    store: web::Data<Arc<dyn Store>>,
    settings: web::Data<Settings>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    if identity.is_some() {
        return Ok(redirect::found("/").finish());
    }

    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        let errors = FormErrors::from(errors);
        return Ok(views::html(render_page(&templates, &form, &errors, None)?));
    }

    let user = store.find_user_by_username(&form.username).await?;
    let verified = match &user {
        Some(user) => password::verify(form.password.clone(), user.password_hash.clone()).await?,
        None => false,
    };

    match user {
        Some(user) if verified => {
            tracing::info!("User {} logged in", user.id);
            Ok(redirect::found(&redirect::account_url(&user.username))
                .cookie(session::issue(&user.username, &settings.session))
                .finish())
        }
        _ => {
            tracing::info!("Rejected login attempt");
            Ok(redirect::found("/login")
                .cookie(flash::flash(LOGIN_FAILED))
                .finish())
        }
    }
}
