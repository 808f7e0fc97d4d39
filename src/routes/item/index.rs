use crate::db::Store;
use crate::errors::AppError;
use crate::middleware::authentication::Identity;
use crate::views::{self, Templates};
use actix_web::{route, web, HttpResponse, Result};
use std::sync::Arc;

#[tracing::instrument(name = "Index page.", skip_all)]
#[route("/", method = "GET", method = "POST")]
pub async fn index_handler(
    identity: Option<Identity>,
    store: web::Data<Arc<dyn Store>>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    let users = store.list_users().await?;
    let reviews = store.list_reviews().await?;
    let items = store.list_items().await?;

    let mut context = views::page_context("Home", identity.as_deref());
    context.insert(
        "users",
        &users
            .iter()
            .map(views::user::Member::from)
            .collect::<Vec<_>>(),
    );
    context.insert(
        "reviews",
        &reviews
            .into_iter()
            .map(views::review::Review::from)
            .collect::<Vec<_>>(),
    );
    context.insert(
        "items",
        &items
            .into_iter()
            .map(views::item::Listing::from)
            .collect::<Vec<_>>(),
    );

    Ok(views::html(templates.render("index.html", &context)?))
}
