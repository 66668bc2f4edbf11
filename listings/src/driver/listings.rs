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

//! Operations on listings.

use crate::db;
use crate::driver::{Driver, LISTING_NOT_FOUND};
use crate::model::{Listing, ListingFields, ListingId};
use log::info;
use wanderlust_core::db::DbError;
use wanderlust_core::driver::{DriverError, DriverResult};

/// Converts a database error into a driver error, reporting missing entries as missing listings.
fn map_listing_error(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound(LISTING_NOT_FOUND.to_owned()),
        e => DriverError::from(e),
    }
}

impl Driver {
    /// Gets all listings in creation order.
    pub(crate) async fn get_listings(self) -> DriverResult<Vec<Listing>> {
        let listings = db::get_listings(&mut self.db.ex().await?).await?;
        Ok(listings)
    }

    /// Gets the listing identified by `id`.
    pub(crate) async fn get_listing(self, id: &ListingId) -> DriverResult<Listing> {
        db::get_listing(&mut self.db.ex().await?, id).await.map_err(map_listing_error)
    }

    /// Creates a new listing with the already-validated `fields`.
    pub(crate) async fn create_listing(self, fields: ListingFields) -> DriverResult<Listing> {
        let listing = db::create_listing(&mut self.db.ex().await?, fields).await?;
        info!("Created listing {}", listing.id());
        Ok(listing)
    }

    /// Replaces the contents of the listing identified by `id` with `fields`.
    ///
    /// Fails with `NotFound` if the listing vanished before the update ran.
    pub(crate) async fn update_listing(
        self,
        id: &ListingId,
        fields: ListingFields,
    ) -> DriverResult<()> {
        db::update_listing(&mut self.db.ex().await?, id, &fields)
            .await
            .map_err(map_listing_error)?;
        info!("Updated listing {}", id);
        Ok(())
    }

    /// Deletes the listing identified by `id`.  Deleting a missing listing is not an error.
    pub(crate) async fn delete_listing(self, id: &ListingId) -> DriverResult<()> {
        match db::delete_listing(&mut self.db.ex().await?, id).await {
            Ok(()) => {
                info!("Deleted listing {}", id);
                Ok(())
            }
            Err(DbError::NotFound) => {
                info!("Listing {} already absent; nothing to delete", id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use crate::model::Price;

    fn cabin() -> ListingFields {
        ListingFields::new(
            "Cabin".to_owned(),
            "Cozy".to_owned(),
            "https://example.com/cabin.jpg".to_owned(),
            Price::new(100.0).unwrap(),
            "Lake".to_owned(),
            "USA".to_owned(),
        )
    }

    fn villa() -> ListingFields {
        ListingFields::new(
            "Villa".to_owned(),
            "Large".to_owned(),
            "https://example.com/villa.jpg".to_owned(),
            Price::new(2500.0).unwrap(),
            "Goa".to_owned(),
            "India".to_owned(),
        )
    }

    #[tokio::test]
    async fn test_get_listings_none() {
        let context = TestContext::setup().await;

        assert!(context.driver().get_listings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_listings_some() {
        let context = TestContext::setup().await;

        let first = db::create_listing(&mut context.ex().await, cabin()).await.unwrap();
        let second = db::create_listing(&mut context.ex().await, villa()).await.unwrap();

        assert_eq!(vec![first, second], context.driver().get_listings().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_listing_ok() {
        let context = TestContext::setup().await;

        let exp_listing = db::create_listing(&mut context.ex().await, cabin()).await.unwrap();

        let listing = context.driver().get_listing(exp_listing.id()).await.unwrap();
        assert_eq!(exp_listing, listing);
    }

    #[tokio::test]
    async fn test_get_listing_not_found() {
        let context = TestContext::setup().await;

        assert_eq!(
            DriverError::NotFound("Listing Not Found".to_owned()),
            context.driver().get_listing(&ListingId::generate()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_create_listing() {
        let context = TestContext::setup().await;

        let listing = context.driver().create_listing(cabin()).await.unwrap();
        assert_eq!(&cabin(), listing.fields());

        let stored = db::get_listing(&mut context.ex().await, listing.id()).await.unwrap();
        assert_eq!(listing, stored);
    }

    #[tokio::test]
    async fn test_update_listing_ok() {
        let context = TestContext::setup().await;

        let listing = db::create_listing(&mut context.ex().await, cabin()).await.unwrap();

        context.driver().update_listing(listing.id(), villa()).await.unwrap();

        let stored = db::get_listing(&mut context.ex().await, listing.id()).await.unwrap();
        assert_eq!(&villa(), stored.fields());
    }

    #[tokio::test]
    async fn test_update_listing_not_found() {
        let context = TestContext::setup().await;

        assert_eq!(
            DriverError::NotFound("Listing Not Found".to_owned()),
            context.driver().update_listing(&ListingId::generate(), villa()).await.unwrap_err()
        );
        assert!(db::get_listings(&mut context.ex().await).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_listing_ok() {
        let context = TestContext::setup().await;

        let listing = db::create_listing(&mut context.ex().await, cabin()).await.unwrap();

        context.driver().delete_listing(listing.id()).await.unwrap();

        assert_eq!(
            DbError::NotFound,
            db::get_listing(&mut context.ex().await, listing.id()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_delete_listing_missing_is_noop() {
        let context = TestContext::setup().await;

        let listing = db::create_listing(&mut context.ex().await, cabin()).await.unwrap();

        context.driver().delete_listing(&ListingId::generate()).await.unwrap();

        assert_eq!(vec![listing], db::get_listings(&mut context.ex().await).await.unwrap());
    }
}
