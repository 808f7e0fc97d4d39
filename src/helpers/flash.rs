//! One-shot messages carried across a redirect in a cookie.

use actix_web::cookie::{time::Duration, Cookie};
use actix_web::HttpRequest;

const FLASH_COOKIE: &str = "flash";

pub fn flash(message: &str) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, urlencoding::encode(message).into_owned())
        .path("/")
        .http_only(true)
        .finish()
}

/// Message left by the previous response, if any. Pair with [`consumed`] so
/// it is shown once.
pub fn take(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    urlencoding::decode(cookie.value())
        .ok()
        .map(|message| message.into_owned())
        .filter(|message| !message.is_empty())
}

pub fn consumed() -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, "")
        .path("/")
        .max_age(Duration::ZERO)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn flash_round_trips_through_request() {
        let cookie = flash("Login failed. Check your username and/or password");
        let req = TestRequest::default().cookie(cookie).to_http_request();

        assert_eq!(
            take(&req).as_deref(),
            Some("Login failed. Check your username and/or password")
        );
    }

    #[test]
    fn no_cookie_no_message() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(take(&req), None);
    }
}
