use actix_web::{http::header, HttpResponse, HttpResponseBuilder};

pub fn found(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::Found();
    builder.insert_header((header::LOCATION, location.to_string()));
    builder
}

pub fn account_url(username: &str) -> String {
    format!("/account/{}", urlencoding::encode(username))
}

pub fn profile_url(username: &str) -> String {
    format!("/user/{}", urlencoding::encode(username))
}
