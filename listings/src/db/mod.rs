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

//! Database abstraction to manipulate listings.

use crate::model::{Listing, ListingFields, ListingId, Price};
use futures::TryStreamExt;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use wanderlust_core::db::sqlite::{self, map_sqlx_error};
use wanderlust_core::db::{DbError, DbResult, Executor};

#[cfg(test)]
mod tests;

/// Initializes the schema of the database.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,
    }
}

impl TryFrom<SqliteRow> for Listing {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(map_sqlx_error)?;
        let image: String = row.try_get("image").map_err(map_sqlx_error)?;
        let price: f64 = row.try_get("price").map_err(map_sqlx_error)?;
        let location: String = row.try_get("location").map_err(map_sqlx_error)?;
        let country: String = row.try_get("country").map_err(map_sqlx_error)?;

        let id = ListingId::parse(&id)?;
        let price = Price::new(price)?;

        Ok(Listing::new(
            id,
            ListingFields::new(title, description, image, price, location, country),
        ))
    }
}

/// Gets all listings in the order in which they were created.
pub(crate) async fn get_listings(ex: &mut Executor) -> DbResult<Vec<Listing>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM listings ORDER BY seq";
            let mut rows = sqlx::query(query_str).fetch(&mut **ex);

            let mut listings = vec![];
            while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
                listings.push(Listing::try_from(row)?);
            }
            Ok(listings)
        }
    }
}

/// Gets the listing identified by `id`.
pub(crate) async fn get_listing(ex: &mut Executor, id: &ListingId) -> DbResult<Listing> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM listings WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(&mut **ex)
                .await
                .map_err(map_sqlx_error)?;
            Listing::try_from(row)
        }
    }
}

/// Stores a new listing with the given `fields` and returns it with its freshly-assigned
/// identifier.
pub(crate) async fn create_listing(ex: &mut Executor, fields: ListingFields) -> DbResult<Listing> {
    let id = ListingId::generate();

    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO listings (id, title, description, image, price, location, country)
                VALUES (?, ?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .bind(fields.title())
                .bind(fields.description())
                .bind(fields.image())
                .bind(fields.price().as_f64())
                .bind(fields.location())
                .bind(fields.country())
                .execute(&mut **ex)
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(Listing::new(id, fields))
}

/// Replaces the contents of the listing identified by `id` with `fields`.
///
/// This is a single blind update: if the listing does not exist, this returns `NotFound`.
pub(crate) async fn update_listing(
    ex: &mut Executor,
    id: &ListingId,
    fields: &ListingFields,
) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE listings
                SET title = ?, description = ?, image = ?, price = ?, location = ?, country = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(fields.title())
                .bind(fields.description())
                .bind(fields.image())
                .bind(fields.price().as_f64())
                .bind(fields.location())
                .bind(fields.country())
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the listing identified by `id`.
pub(crate) async fn delete_listing(ex: &mut Executor, id: &ListingId) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM listings WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}
