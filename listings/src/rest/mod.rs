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

//! Entry point to the web frontend.

use crate::driver::{Driver, LISTING_NOT_FOUND};
use crate::model::ListingId;
use axum::Router;
use axum::extract::Path;
use axum::extract::rejection::PathRejection;
use wanderlust_core::rest::{RestError, RestResult};

mod listing_delete;
mod listing_edit_get;
mod listing_get;
mod listing_new_get;
mod listing_put;
mod listings_get;
mod listings_post;
mod method_override;
mod root_get;
#[cfg(test)]
mod testutils;
mod validate;
mod views;

/// Message reported for requests that do not match any page.
const PAGE_NOT_FOUND: &str = "Page Not Found!";

/// Handler for any request that does not match a known page and verb.
async fn not_found() -> RestError {
    RestError::NotFound(PAGE_NOT_FOUND.to_owned())
}

/// Listing identifier as extracted from the path of a request, before any validation.
type ListingPath = Result<Path<String>, PathRejection>;

/// Parses a listing identifier received in a path.
///
/// Identifiers that cannot be decoded or that are malformed cannot refer to any stored listing, so
/// they are reported in the same way as missing listings.
fn parse_listing_id(path: ListingPath) -> RestResult<ListingId> {
    let not_found = || RestError::NotFound(LISTING_NOT_FOUND.to_owned());
    let Path(id) = path.map_err(|_| not_found())?;
    ListingId::parse(&id).map_err(|_| not_found())
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    let router = Router::new()
        .route("/", get(root_get::handler).fallback(not_found))
        .route(
            "/listings",
            get(listings_get::handler).post(listings_post::handler).fallback(not_found),
        )
        .route("/listings/new", get(listing_new_get::handler).fallback(not_found))
        .route(
            "/listings/:id",
            get(listing_get::handler)
                .put(listing_put::handler)
                .delete(listing_delete::handler)
                .fallback(not_found),
        )
        .route("/listings/:id/edit", get(listing_edit_get::handler).fallback(not_found))
        .fallback(not_found)
        .with_state(driver);
    Router::new().fallback_service(method_override::layer(router))
}
