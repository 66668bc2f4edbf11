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

//! Common tests for any database implementation.

use super::*;
use std::sync::Arc;
use wanderlust_core::db::Db;

/// Builds a valid set of listing contents whose fields derive from `title`.
fn fields(title: &str, price: f64) -> ListingFields {
    ListingFields::new(
        title.to_owned(),
        format!("Description of {}", title),
        format!("https://example.com/{}.jpg", title),
        Price::new(price).unwrap(),
        "Lake Tahoe".to_owned(),
        "USA".to_owned(),
    )
}

pub(crate) async fn test_listings_empty(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert!(get_listings(&mut ex).await.unwrap().is_empty());
}

pub(crate) async fn test_listings_create_and_get(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let listing = create_listing(&mut ex, fields("cabin", 100.0)).await.unwrap();
    assert_eq!(&fields("cabin", 100.0), listing.fields());

    assert_eq!(listing, get_listing(&mut ex, listing.id()).await.unwrap());
}

pub(crate) async fn test_listings_insertion_order(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let second = create_listing(&mut ex, fields("zebra", 10.0)).await.unwrap();
    let first = create_listing(&mut ex, fields("aardvark", 20.0)).await.unwrap();
    let third = create_listing(&mut ex, fields("mole", 30.5)).await.unwrap();

    assert_eq!(vec![second, first, third], get_listings(&mut ex).await.unwrap());
}

pub(crate) async fn test_listings_get_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_listing(&mut ex, fields("cabin", 100.0)).await.unwrap();

    assert_eq!(DbError::NotFound, get_listing(&mut ex, &ListingId::generate()).await.unwrap_err());
}

pub(crate) async fn test_listings_update_ok(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let listing = create_listing(&mut ex, fields("cabin", 100.0)).await.unwrap();
    let other = create_listing(&mut ex, fields("villa", 900.0)).await.unwrap();

    update_listing(&mut ex, listing.id(), &fields("chalet", 150.0)).await.unwrap();

    assert_eq!(&fields("chalet", 150.0), get_listing(&mut ex, listing.id()).await.unwrap().fields());
    assert_eq!(other, get_listing(&mut ex, other.id()).await.unwrap());
}

pub(crate) async fn test_listings_update_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(
        DbError::NotFound,
        update_listing(&mut ex, &ListingId::generate(), &fields("cabin", 1.0)).await.unwrap_err()
    );
    assert!(get_listings(&mut ex).await.unwrap().is_empty());
}

pub(crate) async fn test_listings_delete_ok(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let listing = create_listing(&mut ex, fields("cabin", 100.0)).await.unwrap();
    let other = create_listing(&mut ex, fields("villa", 900.0)).await.unwrap();

    delete_listing(&mut ex, listing.id()).await.unwrap();

    assert_eq!(DbError::NotFound, get_listing(&mut ex, listing.id()).await.unwrap_err());
    assert_eq!(vec![other], get_listings(&mut ex).await.unwrap());
}

pub(crate) async fn test_listings_delete_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(DbError::NotFound, delete_listing(&mut ex, &ListingId::generate()).await.unwrap_err());
}

pub(crate) async fn test_listings_corrupted_price(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let listing = create_listing(&mut ex, fields("cabin", 100.0)).await.unwrap();
    match &mut ex {
        Executor::Sqlite(ex) => {
            sqlx::query("UPDATE listings SET price = -5 WHERE id = ?")
                .bind(listing.id().to_string())
                .execute(&mut **ex)
                .await
                .unwrap();
        }
    }

    match get_listing(&mut ex, listing.id()).await {
        Err(DbError::DataIntegrityError(e)) => assert!(e.contains("cannot be negative")),
        e => panic!("{:?}", e),
    }
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        wanderlust_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_listings_empty,
            test_listings_create_and_get,
            test_listings_insertion_order,
            test_listings_get_not_found,
            test_listings_update_ok,
            test_listings_update_not_found,
            test_listings_delete_ok,
            test_listings_delete_not_found,
            test_listings_corrupted_price
        );
    }
];

mod on_sqlite {
    use super::*;

    /// Creates an in-memory database with the schema of the app.
    async fn setup() -> Arc<dyn Db + Send + Sync> {
        let db = Arc::from(wanderlust_core::db::sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(setup().await);
}
