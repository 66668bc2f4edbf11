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

//! High-level data types.

use derive_getters::Getters;
use derive_more::{Constructor, Display};
use uuid::Uuid;
use wanderlust_core::model::{ModelError, ModelResult};

/// Picture used for listings that are submitted without one.
pub(crate) const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1625505826533-5c80aca7d157?auto=format&fit=crop&w=800&q=60";

/// Opaque identifier of a listing, assigned by the store on creation.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub(crate) struct ListingId(Uuid);

impl ListingId {
    /// Generates a new random identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its textual representation `s`.
    pub(crate) fn parse(s: &str) -> ModelResult<Self> {
        match Uuid::parse_str(s) {
            Ok(uuid) => Ok(Self(uuid)),
            Err(e) => Err(ModelError(format!("Invalid listing id '{}': {}", s, e))),
        }
    }
}

/// Nightly price of a listing.  Guaranteed to be finite and not negative.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub(crate) struct Price(f64);

impl Price {
    /// Creates a new price from an untrusted `value`, making sure it is valid.
    pub(crate) fn new(value: f64) -> ModelResult<Self> {
        if !value.is_finite() {
            return Err(ModelError(format!("Price must be a finite number but got {}", value)));
        }
        if value < 0.0 {
            return Err(ModelError(format!("Price cannot be negative but got {}", value)));
        }
        Ok(Self(value))
    }

    /// Returns the price as a floating point number.
    pub(crate) fn as_f64(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-provided contents of a listing.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct ListingFields {
    /// Short name of the property.
    title: String,

    /// Free-form description of the property.
    description: String,

    /// URL of the picture of the property.
    image: String,

    /// Nightly price.
    price: Price,

    /// City or area where the property is.
    location: String,

    /// Country where the property is.
    country: String,
}

/// A listing as persisted in the store.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct Listing {
    /// Identifier of the listing.
    id: ListingId,

    /// Contents of the listing.
    fields: ListingFields,
}
