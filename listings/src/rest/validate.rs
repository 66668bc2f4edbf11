// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Extractor that validates listing submissions before a handler runs.

use crate::model::ListingFields;
use crate::validation::validate_listing;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use http::header;
use mime::Mime;
use serde_json::{Map, Value};
use wanderlust_core::rest::{RestError, RestResult};

/// Contents of a listing that passed validation.
///
/// Using this as the last argument of a handler guarantees that the handler body only runs for
/// acceptable submissions: any violation is returned as an `InvalidRequest` error instead.
pub(crate) struct ValidListing(pub(crate) ListingFields);

/// Converts the pairs of a decoded form into a document, nesting keys like `listing[title]`.
///
/// A plain key always takes precedence over nested keys with the same prefix, regardless of the
/// order in which they appear, so that mixing `listing=x` with `listing[title]=y` yields a
/// non-object `listing` that fails validation.
fn nest_form_fields(pairs: Vec<(String, String)>) -> Value {
    let mut document = Map::new();
    for (key, value) in pairs {
        let nested = key.split_once('[').and_then(|(outer, rest)| {
            rest.strip_suffix(']').map(|inner| (outer.to_owned(), inner.to_owned()))
        });
        match nested {
            Some((outer, inner)) => {
                let entry = document.entry(outer).or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(object) = entry {
                    object.insert(inner, Value::String(value));
                }
            }
            None => {
                document.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(document)
}

/// Decodes `body` into a document according to its `content_type`.
///
/// Empty bodies and bodies of unknown types are treated as empty documents so that validation
/// reports the missing fields.
fn parse_payload(content_type: Option<&Mime>, body: &[u8]) -> RestResult<Value> {
    match content_type.map(Mime::essence_str) {
        Some(t) if t == mime::APPLICATION_JSON.essence_str() => {
            if body.is_empty() {
                Ok(Value::Object(Map::new()))
            } else {
                Ok(serde_json::from_slice(body)?)
            }
        }
        Some(t) if t == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() => {
            let pairs = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
                .map_err(|e| RestError::InvalidRequest(e.to_string()))?;
            Ok(nest_form_fields(pairs))
        }
        _ => Ok(Value::Object(Map::new())),
    }
}

#[async_trait]
impl<S> FromRequest<S> for ValidListing
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Mime>().ok());
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| RestError::InvalidRequest(e.body_text()))?;

        let payload = parse_payload(content_type.as_ref(), &body)?;
        let fields = validate_listing(&payload).map_err(RestError::InvalidRequest)?;
        Ok(ValidListing(fields))
    }
}
