// src/middleware/html_form.rs
// DOCUMENTATION: Extractor for urlencoded bodies with nested and repeated keys
// PURPOSE: Decode `images[0][url]=..`, `delete_images[]=..` and repeated plain keys

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use actix_web::{dev::Payload, error, web, FromRequest, HttpMessage, HttpRequest};
use serde::de::DeserializeOwned;

/// Deepest bracket nesting accepted in a form key
const MAX_DEPTH: usize = 5;

/// Urlencoded request body decoded with serde_qs
pub struct HtmlForm<T>(pub T);

impl<T> HtmlForm<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for HtmlForm<T> {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let is_form = req
            .content_type()
            .eq_ignore_ascii_case("application/x-www-form-urlencoded");
        let body = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            if !is_form {
                return Err(error::ErrorUnsupportedMediaType("expected a urlencoded form"));
            }
            let bytes = body.await?;
            let text = std::str::from_utf8(&bytes).map_err(error::ErrorBadRequest)?;
            decode_form(text).map(HtmlForm).map_err(error::ErrorBadRequest)
        })
    }
}

/// Decode a urlencoded body into `T`
pub fn decode_form<T: DeserializeOwned>(body: &str) -> Result<T, serde_qs::Error> {
    serde_qs::Config::new(MAX_DEPTH, false).deserialize_str(&index_repeated_keys(body))
}

/// Rewrite `key[]` and repeated plain keys as `key[0]`, `key[1]`, ...
fn index_repeated_keys(body: &str) -> String {
    let pairs: Vec<(&str, &str)> = body
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for (key, _) in &pairs {
        *totals.entry(*key).or_default() += 1;
    }

    let mut next_index: HashMap<&str, usize> = HashMap::new();
    pairs
        .iter()
        .map(|&(key, value)| {
            let base = strip_empty_brackets(key).or_else(|| {
                let repeated = totals.get(key).copied().unwrap_or(0) > 1;
                (repeated && !has_brackets(key)).then_some(key)
            });
            match base {
                Some(base) => {
                    let index = next_index.entry(base).or_default();
                    let rewritten = format!("{}[{}]={}", base, index, value);
                    *index += 1;
                    rewritten
                }
                None => format!("{}={}", key, value),
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn strip_empty_brackets(key: &str) -> Option<&str> {
    key.strip_suffix("[]").or_else(|| {
        let split = key.len().checked_sub(6)?;
        let suffix = key.get(split..)?;
        suffix.eq_ignore_ascii_case("%5B%5D").then(|| &key[..split])
    })
}

fn has_brackets(key: &str) -> bool {
    key.contains('[') || key.to_ascii_uppercase().contains("%5B")
}
