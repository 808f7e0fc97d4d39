use crate::db::Store;
use crate::errors::AppError;
use crate::middleware::authentication::Identity;
use crate::views::{self, Templates};
use actix_web::{get, web, HttpResponse, Result};
use std::sync::Arc;

#[tracing::instrument(name = "Public profile page.", skip(identity, store, templates))]
#[get("/user/{username}")]
pub async fn user_detail_handler(
    path: web::Path<(String,)>,
    identity: Option<Identity>,
    store: web::Data<Arc<dyn Store>>,
    templates: web::Data<Templates>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner().0;
    let poster = store
        .find_user_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = store.list_items_by_poster(poster.id).await?;

    let mut context = views::page_context(&poster.username, identity.as_deref());
    context.insert("profile", &views::user::Profile::from(&poster));
    context.insert(
        "items",
        &items
            .into_iter()
            .map(views::item::Listing::from)
            .collect::<Vec<_>>(),
    );

    Ok(views::html(templates.render("user_detail.html", &context)?))
}
