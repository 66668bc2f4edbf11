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

//! Support for HTML forms that need to issue `PUT` and `DELETE` requests.
//!
//! Browsers can only submit forms with `GET` and `POST`, so forms that update or delete listings
//! post to a URL with a `_method` query parameter naming the desired verb.  The request is
//! rewritten before routing so that handlers only ever see the intended verb.

use axum::Router;
use axum::extract::Request;
use http::Method;
use tower::util::MapRequest;

/// Name of the query parameter that carries the overriding verb.
const OVERRIDE_PARAM: &str = "_method";

/// Rewrites the method of `req` if it is a `POST` that asks for a `PUT` or a `DELETE`.
fn override_method(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }

    let requested = match req.uri().query() {
        Some(query) => serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .unwrap_or_default()
            .into_iter()
            .find(|(key, _)| key == OVERRIDE_PARAM)
            .map(|(_, value)| value.to_ascii_uppercase()),
        None => None,
    };

    match requested.as_deref() {
        Some("PUT") => *req.method_mut() = Method::PUT,
        Some("DELETE") => *req.method_mut() = Method::DELETE,
        _ => (),
    }
    req
}

/// Wraps `router` so that method overrides are applied before routing.
pub(crate) fn layer(router: Router) -> MapRequest<Router, fn(Request) -> Request> {
    MapRequest::new(router, override_method as fn(Request) -> Request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(method: Method, uri: &str) -> Request {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_override_put() {
        let req = override_method(request(Method::POST, "/listings/x?_method=PUT"));
        assert_eq!(Method::PUT, req.method());
        assert_eq!("/listings/x?_method=PUT", req.uri().to_string());
    }

    #[test]
    fn test_override_delete_case_insensitive() {
        let req = override_method(request(Method::POST, "/listings/x?foo=bar&_method=delete"));
        assert_eq!(Method::DELETE, req.method());
    }

    #[test]
    fn test_override_ignores_unknown_verbs() {
        let req = override_method(request(Method::POST, "/listings?_method=PATCH"));
        assert_eq!(Method::POST, req.method());
    }

    #[test]
    fn test_override_only_applies_to_post() {
        let req = override_method(request(Method::GET, "/listings/x?_method=DELETE"));
        assert_eq!(Method::GET, req.method());
    }

    #[test]
    fn test_override_without_query() {
        let req = override_method(request(Method::POST, "/listings"));
        assert_eq!(Method::POST, req.method());
    }
}
