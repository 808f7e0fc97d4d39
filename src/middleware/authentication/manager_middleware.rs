use crate::configuration::Settings;
use crate::db::Store;
use crate::middleware::authentication::session;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse},
    web, Error, HttpMessage,
};
use futures::future::{FutureExt, LocalBoxFuture};
use std::rc::Rc;
use std::sync::Arc;

pub struct ManagerMiddleware<S> {
    pub service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ManagerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        async move {
            try_session(&req).await;
            service.call(req).await
        }
        .boxed_local()
    }
}

/// Binds the user named by a valid session cookie to the request.
///
/// A missing, forged or stale cookie (its username no longer exists) leaves
/// the request anonymous, and so does a store that cannot be reached.
#[tracing::instrument(name = "Authenticate with session cookie", skip(req))]
async fn try_session(req: &ServiceRequest) -> bool {
    let settings = match req.app_data::<web::Data<Settings>>() {
        Some(settings) => settings,
        None => return false,
    };
    let cookie = match req.cookie(&settings.session.cookie_name) {
        Some(cookie) => cookie,
        None => return false,
    };
    let username = match session::decode(cookie.value(), &settings.session.secret) {
        Some(username) => username,
        None => {
            tracing::debug!("Ignoring session cookie with a bad signature");
            return false;
        }
    };

    let store = match req.app_data::<web::Data<Arc<dyn Store>>>() {
        Some(store) => store,
        None => return false,
    };
    match store.find_user_by_username(&username).await {
        Ok(Some(user)) => {
            tracing::debug!("Session resolved to user {}", user.id);
            req.extensions_mut().insert(Arc::new(user));
            true
        }
        Ok(None) => {
            tracing::debug!("Session names a user that no longer exists");
            false
        }
        Err(err) => {
            tracing::error!("Failed to resolve session user: {:?}", err);
            false
        }
    }
}
