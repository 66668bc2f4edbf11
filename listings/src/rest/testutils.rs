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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use wanderlust_core::db::{Db, DbError};

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app, for direct access to the data.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app using an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::from(wanderlust_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    /// Returns a copy of the app under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app under test.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Closes the database so that any further access from the app fails.
    pub(crate) async fn close_db(&self) {
        self.db.close().await;
    }

    /// Stores a listing titled `title` directly in the database.
    pub(crate) async fn create_listing(&self, title: &str) -> Listing {
        let fields = ListingFields::new(
            title.to_owned(),
            format!("Description of {}", title),
            DEFAULT_IMAGE.to_owned(),
            Price::new(150.0).unwrap(),
            "Somewhere".to_owned(),
            "Nowhere".to_owned(),
        );
        db::create_listing(&mut self.db.ex().await.unwrap(), fields).await.unwrap()
    }

    /// Gets the listing identified by `id` directly from the database, if it exists.
    pub(crate) async fn get_listing(&self, id: &ListingId) -> Option<Listing> {
        match db::get_listing(&mut self.db.ex().await.unwrap(), id).await {
            Ok(listing) => Some(listing),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Gets all listings directly from the database.
    pub(crate) async fn listings(&self) -> Vec<Listing> {
        db::get_listings(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}

/// Returns the pairs of an HTML form that submits `listing`.
pub(crate) fn listing_form(listing: &[(&str, &str)]) -> Vec<(String, String)> {
    listing.iter().map(|(k, v)| (format!("listing[{}]", k), (*v).to_owned())).collect()
}

/// Returns the pairs of an HTML form that submits a valid cabin.
pub(crate) fn cabin_form() -> Vec<(String, String)> {
    listing_form(&[
        ("title", "Cabin"),
        ("description", "Cozy"),
        ("image", ""),
        ("price", "100"),
        ("location", "Lake"),
        ("country", "USA"),
    ])
}

/// Returns the JSON document that submits a valid cabin.
pub(crate) fn cabin_json() -> serde_json::Value {
    json!({
        "listing": {
            "title": "Cabin",
            "description": "Cozy",
            "price": 100,
            "location": "Lake",
            "country": "USA"
        }
    })
}
