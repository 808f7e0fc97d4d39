use crate::db::StoreError;
use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};

/// Failures a page handler can end in. Every variant resolves to a page or a
/// redirect; validation problems never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No session is bound to the request.
    #[error("authentication required")]
    Unauthorized,
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("password hashing failed: {0}")]
    Password(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::FOUND,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Template(_) | Self::Password(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Unauthorized => HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            Self::NotFound => HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(NOT_FOUND_PAGE),
            err => {
                tracing::error!("Request failed: {:?}", err);
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

const NOT_FOUND_PAGE: &str = include_str!("../templates/404.html");
