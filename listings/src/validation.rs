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

//! Acceptance rule for listing submissions.
//!
//! A submission is a document with a `listing` object whose fields are checked in a fixed order.
//! Every violation is reported, not just the first one, so that the user can fix them all at once.

use crate::model::{DEFAULT_IMAGE, ListingFields, Price};
use serde_json::{Map, Value};

/// Names of the fields accepted inside the `listing` object.
const KNOWN_FIELDS: &[&str] = &["title", "description", "location", "country", "price", "image"];

/// Separator between the messages of individual violations.
const SEPARATOR: &str = ",";

/// Validates a required, non-empty text field called `name`.
fn required_text(
    listing: &Map<String, Value>,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match listing.get(name) {
        None | Some(Value::Null) => {
            errors.push(format!("\"listing.{}\" is required", name));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(format!("\"listing.{}\" is not allowed to be empty", name));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(format!("\"listing.{}\" must be a string", name));
            None
        }
    }
}

/// Validates the optional `image` field, replacing missing or empty values with the default.
fn image(listing: &Map<String, Value>, errors: &mut Vec<String>) -> Option<String> {
    match listing.get("image") {
        None | Some(Value::Null) => Some(DEFAULT_IMAGE.to_owned()),
        Some(Value::String(s)) if s.is_empty() => Some(DEFAULT_IMAGE.to_owned()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push("\"listing.image\" must be a string".to_owned());
            None
        }
    }
}

/// Validates the required `price` field.  Numeric strings, as sent by HTML forms, are converted.
fn price(listing: &Map<String, Value>, errors: &mut Vec<String>) -> Option<Price> {
    let value = match listing.get("price") {
        None | Some(Value::Null) => {
            errors.push("\"listing.price\" is required".to_owned());
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(value) if !value.is_finite() => {
            errors.push("\"listing.price\" must be a number".to_owned());
            None
        }
        Some(value) if value < 0.0 => {
            errors.push("\"listing.price\" must be greater than or equal to 0".to_owned());
            None
        }
        Some(value) => Price::new(value).ok(),
        None => {
            errors.push("\"listing.price\" must be a number".to_owned());
            None
        }
    }
}

/// Checks that `payload` holds an acceptable listing and extracts its fields.
///
/// On failure, returns the messages of all violations joined by commas in the order in which
/// the fields are checked.
pub(crate) fn validate_listing(payload: &Value) -> Result<ListingFields, String> {
    let listing = match payload.get("listing") {
        None => return Err("\"listing\" is required".to_owned()),
        Some(Value::Object(listing)) => listing,
        Some(_) => return Err("\"listing\" must be of type object".to_owned()),
    };

    let mut errors = vec![];
    let title = required_text(listing, "title", &mut errors);
    let description = required_text(listing, "description", &mut errors);
    let location = required_text(listing, "location", &mut errors);
    let country = required_text(listing, "country", &mut errors);
    let price = price(listing, &mut errors);
    let image = image(listing, &mut errors);
    for key in listing.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            errors.push(format!("\"listing.{}\" is not allowed", key));
        }
    }

    match (title, description, image, price, location, country) {
        (Some(title), Some(description), Some(image), Some(price), Some(location), Some(country))
            if errors.is_empty() =>
        {
            Ok(ListingFields::new(title, description, image, price, location, country))
        }
        _ => Err(errors.join(SEPARATOR)),
    }
}
