use crate::errors::AppError;
use crate::models;
use crate::views::user::Profile;
use actix_web::HttpResponse;
use tera::{Context, Tera};

const BASE_TEMPLATE: &str = include_str!("../../templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const USER_DETAIL_TEMPLATE: &str = include_str!("../../templates/user_detail.html");
const REGISTER_TEMPLATE: &str = include_str!("../../templates/register.html");
const LOGIN_TEMPLATE: &str = include_str!("../../templates/login.html");
const ACCOUNT_TEMPLATE: &str = include_str!("../../templates/account.html");

/// Page templates compiled once at startup. Names ending in `.html` are autoescaped.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("index.html", INDEX_TEMPLATE),
            ("user_detail.html", USER_DETAIL_TEMPLATE),
            ("register.html", REGISTER_TEMPLATE),
            ("login.html", LOGIN_TEMPLATE),
            ("account.html", ACCOUNT_TEMPLATE),
        ])?;

        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, AppError> {
        self.tera.render(name, context).map_err(|err| {
            tracing::error!("Failed to render {}: {:?}", name, err);
            AppError::from(err)
        })
    }
}

/// Context every page starts from: title and the signed-in user for the navbar.
pub fn page_context(title: &str, current_user: Option<&models::User>) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context.insert("current_user", &current_user.map(Profile::from));
    context
}

pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_compile() {
        assert!(Templates::new().is_ok());
    }

    #[test]
    fn values_are_escaped() {
        let templates = Templates::new().unwrap();
        let mut context = page_context("Login", None);
        context.insert("form", &serde_json::json!({ "username": "<script>" }));
        context.insert("errors", &serde_json::json!({}));
        context.insert("flash", &Option::<String>::None);

        let page = templates.render("login.html", &context).unwrap();
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }
}
