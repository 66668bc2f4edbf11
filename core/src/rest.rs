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

//! Generic code for page handlers.
//!
//! All services should implement an `app` function in their `rest` module that returns the
//! `Router` for the application.
//!
//! Every page should be put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every page in its own file makes it easy to ensure all the
//! integration tests for the given page truly belong to that page.
//!
//! More specifically, the `tests` module within a page should define a `route` method that
//! returns the HTTP method and the path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired page.
//!
//! It is also useful for the tests in this layer to define a `TestContext` in a `testutils` module
//! that allows interacting with the database layer directly, using simplified types.
//!
//! Every failure in a handler is a `RestError`, which renders the same error page with the
//! status code and message of the error.  Handlers never render errors on their own.

use crate::driver::DriverError;
use crate::model::ModelError;
use crate::template;
use axum::response::{Html, IntoResponse, Response};
use http::StatusCode;
use log::error;

/// Message shown to the user when an error carries no message or when the details of the error
/// must not be exposed.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something Went Wrong";

/// Template for the page that renders any error.
const ERROR_TEMPLATE: &str = include_str!("rest/error.html");

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.  Its details are logged, not rendered.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity or page does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl RestError {
    /// Returns the HTTP status code that represents this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Returns the message to show to the user for this error.
    pub fn public_message(&self) -> String {
        match self {
            RestError::InternalError(_) => DEFAULT_ERROR_MESSAGE.to_owned(),
            e => {
                let message = e.to_string();
                if message.is_empty() { DEFAULT_ERROR_MESSAGE.to_owned() } else { message }
            }
        }
    }
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl From<serde_json::Error> for RestError {
    fn from(e: serde_json::Error) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        if let RestError::InternalError(details) = &self {
            error!("Request failed: {}", details);
        }

        let status = self.status();
        let page = template::apply(
            ERROR_TEMPLATE,
            &[
                ("status", status.as_str()),
                ("message", &template::escape(&self.public_message())),
            ],
        );
        (status, Html(page)).into_response()
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// Test utilities to drive a `Router` without a real server.
#[cfg(feature = "testutils")]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::extract::Request;
    use http::{HeaderName, HeaderValue};
    use serde::Serialize;
    use tower::util::ServiceExt;

    /// Maximum body size for testing purposes.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Builder for a single request to the app.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// Builder for the request that will be sent to the app.
        builder: http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Extends the URI in the request with a `query`.
        pub fn with_query<Q: Serialize>(mut self, query: Q) -> Self {
            let uri = self.builder.uri_ref().unwrap().to_string();
            assert!(!uri.contains('?'), "URI already contains a query: {}", uri);
            assert!(!uri.contains('#'), "URI contains a fragment: {}", uri);
            self.builder = self.builder.uri(format!(
                "{}?{}",
                uri,
                serde_urlencoded::to_string(query).unwrap()
            ));
            self
        }

        /// Sets the header `name` to `value` in the outgoing request.
        pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
        where
            HeaderName: TryFrom<K>,
            <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
            HeaderValue: TryFrom<V>,
            <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
        {
            self.builder = self.builder.header(name, value);
            self
        }

        /// Sends the fully-built `request` to the app.
        async fn send(self, request: Request) -> ResponseChecker {
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with an empty payload.
        pub async fn send_empty(mut self) -> ResponseChecker {
            let builder = std::mem::take(&mut self.builder);
            let request = builder.body(Body::empty()).unwrap();
            self.send(request).await
        }

        /// Finishes building the request and sends it with a text payload.
        pub async fn send_text<T: Into<String>>(mut self, text: T) -> ResponseChecker {
            let builder = std::mem::take(&mut self.builder);
            let request = builder
                .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
                .body(Body::from(text.into()))
                .unwrap();
            self.send(request).await
        }

        /// Finishes building the request and sends it with a form encoded in the
        /// body as the payload.
        pub async fn send_form<T: Serialize>(mut self, form: T) -> ResponseChecker {
            let builder = std::mem::take(&mut self.builder);
            let request = builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
                .body(Body::from(serde_urlencoded::to_string(&form).unwrap()))
                .unwrap();
            self.send(request).await
        }

        /// Finishes building the request and sends it with a JSON payload.
        pub async fn send_json<T: Serialize>(mut self, json: T) -> ResponseChecker {
            let builder = std::mem::take(&mut self.builder);
            let request = builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap();
            self.send(request).await
        }
    }

    /// Validator for the outcome of a request sent by a `OneShotBuilder`.
    #[must_use]
    pub struct ResponseChecker {
        /// Actual response that we received from the app.
        response: Response,

        /// Expected HTTP status code in the response above.
        exp_status: StatusCode,
    }

    impl From<Response> for ResponseChecker {
        fn from(response: Response) -> Self {
            Self { response, exp_status: StatusCode::OK }
        }
    }

    /// Reverts the transformations done by `template::escape`.
    fn unescape(text: &str) -> String {
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    impl ResponseChecker {
        /// Sets the expected exit HTTP status to `status`.
        pub fn expect_status(mut self, status: StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Performs common validation operations on the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Consumes the response and returns its body as UTF-8.
        async fn into_body_text(self) -> String {
            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            String::from_utf8(body.to_vec()).unwrap()
        }

        /// Finishes checking the response and expects it to contain an empty body.
        pub async fn expect_empty(self) {
            self.verify();

            let body = self.into_body_text().await;
            assert!(body.is_empty(), "Body not empty; got {}", body);
        }

        /// Finishes checking the response and expects it to be a redirection to `location`.
        pub async fn expect_redirect(mut self, location: &str) {
            self.exp_status = StatusCode::SEE_OTHER;
            self.verify();

            let actual = self
                .response
                .headers()
                .get(http::header::LOCATION)
                .expect("Redirections must have a location")
                .to_str()
                .unwrap();
            assert_eq!(location, actual);
        }

        /// Finishes checking the response and expects its body to be the error page with a
        /// message that matches `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            self.verify();

            let body = self.into_body_text().await;
            let message_re = regex::Regex::new(r#"(?s)<p class="error-message">(.*?)</p>"#).unwrap();
            let message = match message_re.captures(&body) {
                Some(captures) => unescape(&captures[1]),
                None => panic!("Response is not an error page; content was {}", body),
            };
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(
                re.is_match(&message),
                "Error message '{}' does not match re '{}'",
                message,
                exp_re
            );
        }

        /// Finishes checking the response and expects its body to be valid UTF-8 and to match
        /// `exp_re`.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use expect_empty to validate empty responses");

            self.verify();

            let body = self.into_body_text().await;
            assert!(
                !body.contains("class=\"error-message\""),
                "Use expect_error to validate rendered error pages"
            );
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body content '{}' does not match re '{}'", body, exp_re);
        }

        /// Finishes checking the response and returns the body of the response as UTF-8.
        pub async fn take_body_as_text(self) -> String {
            self.verify();

            self.into_body_text().await
        }

        /// Finishes checking the response and returns the response itself for out of band
        /// validation of properties not supported by the `ResponseChecker`.
        pub async fn take_response(self) -> Response {
            self.verify();

            self.response
        }
    }
}
