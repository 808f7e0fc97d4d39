use crate::configuration::Settings;
use actix_multipart::Multipart;
use actix_web::{dev::Payload, error, http::header, web, FromRequest, HttpRequest};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::StreamExt;
use std::collections::HashMap;

const DEFAULT_UPLOAD_LIMIT: usize = 5 * 1024 * 1024;

/// File part of a multipart submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Raw fields of a posted form, url-encoded or multipart.
///
/// Pages hosting several forms take this instead of a typed `web::Form` so
/// the handler can decide which form it is looking at before reading any
/// field.
#[derive(Debug, Default, Clone)]
pub struct Submission {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl Submission {
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            files: HashMap::new(),
        }
    }

    /// Value of a text field; an absent field reads as empty input.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_multipart(mut multipart: Multipart, limit: usize) -> Result<Submission, error::Error> {
    let mut submission = Submission::default();
    let mut total = 0usize;

    while let Some(field) = multipart.next().await {
        let mut field = field?;
        let disposition = field.content_disposition();
        let name = match disposition.get_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let filename = disposition.get_filename().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            total += chunk.len();
            if total > limit {
                tracing::warn!("Rejecting submission larger than {} bytes", limit);
                return Err(error::ErrorPayloadTooLarge("Upload is too large"));
            }
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) => {
                submission.files.insert(
                    name,
                    Upload { filename, bytes },
                );
            }
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| error::ErrorBadRequest("Form field is not valid UTF-8"))?;
                submission.fields.insert(name, value);
            }
        }
    }

    Ok(submission)
}

impl FromRequest for Submission {
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if is_multipart(req) {
            let limit = req
                .app_data::<web::Data<Settings>>()
                .map(|settings| settings.max_upload_bytes)
                .unwrap_or(DEFAULT_UPLOAD_LIMIT);
            let multipart = Multipart::new(req.headers(), payload.take());
            return read_multipart(multipart, limit).boxed_local();
        }

        let form = web::Form::<Vec<(String, String)>>::from_request(req, payload);
        async move {
            let form = form.await?;
            Ok(Submission::from_fields(form.into_inner()))
        }
        .boxed_local()
    }
}
