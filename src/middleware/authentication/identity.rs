use crate::errors::AppError;
use crate::models;
use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use std::ops::Deref;
use std::sync::Arc;

/// The user bound to the current request by the session middleware.
///
/// Extracting it from an anonymous request fails with
/// [`AppError::Unauthorized`], which redirects to the login page. Use
/// `Option<Identity>` on pages open to everyone.
#[derive(Debug, Clone)]
pub struct Identity(Arc<models::User>);

impl Identity {
    pub fn user(&self) -> &models::User {
        &self.0
    }
}

impl Deref for Identity {
    type Target = models::User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Arc<models::User>>()
                .cloned()
                .map(Identity)
                .ok_or(AppError::Unauthorized),
        )
    }
}
