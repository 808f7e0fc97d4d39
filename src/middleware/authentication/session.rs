//! Session cookie binding a browser to a username.
//!
//! The cookie value is `<url-encoded username>.<signature>` where the
//! signature is an HMAC-SHA256 of the encoded username, base64url without
//! padding. The username itself is the session identifier, so renaming a
//! user orphans every cookie issued under the old name.

use crate::configuration::SessionSettings;
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str) -> HmacSha256 {
    // HMAC accepts keys of any length
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size")
}

pub fn encode(username: &str, secret: &str) -> String {
    let encoded = urlencoding::encode(username);
    let mut mac = mac(secret);
    mac.update(encoded.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    format!("{encoded}.{signature}")
}

/// Username carried by a cookie value, if the signature checks out.
pub fn decode(value: &str, secret: &str) -> Option<String> {
    let (encoded, signature) = value.rsplit_once('.')?;
    let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

    let mut mac = mac(secret);
    mac.update(encoded.as_bytes());
    mac.verify_slice(&signature).ok()?;

    urlencoding::decode(encoded).ok().map(|name| name.into_owned())
}

pub fn issue(username: &str, settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build(settings.cookie_name.clone(), encode(username, &settings.secret))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn clear(settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build(settings.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .finish()
}
