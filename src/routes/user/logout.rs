use crate::configuration::Settings;
use crate::helpers::redirect;
use crate::middleware::authentication::{session, Identity};
use actix_web::{get, web, HttpResponse};

#[tracing::instrument(name = "Log out.", skip_all, fields(user_id = %identity.id))]
#[get("/logout")]
pub async fn logout_handler(identity: Identity, settings: web::Data<Settings>) -> HttpResponse {
    redirect::found("/")
        .cookie(session::clear(&settings.session))
        .finish()
}
