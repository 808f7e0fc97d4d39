use crate::configuration::Settings;
use crate::db::Store;
use crate::middleware;
use crate::routes;
use crate::views::Templates;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

/// Registers every page, the health check and the static assets.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::health_check)
        .service(routes::item::index_handler)
        .service(routes::item::user_detail_handler)
        .service(routes::user::register_page_handler)
        .service(routes::user::register_handler)
        .service(routes::user::login_page_handler)
        .service(routes::user::login_handler)
        .service(routes::user::logout_handler)
        .service(routes::user::own_account_handler)
        .service(routes::user::account_page_handler)
        .service(routes::user::account_submit_handler)
        .service(actix_files::Files::new("/static", "static"));
}

pub async fn run(
    listener: TcpListener,
    store: Arc<dyn Store>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let templates = Templates::new()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let templates = web::Data::new(templates);
    let store = web::Data::new(store);
    let settings = web::Data::new(settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::authentication::Manager::new())
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(templates.clone())
            .app_data(settings.clone())
            .configure(configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
