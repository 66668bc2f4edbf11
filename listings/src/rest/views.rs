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

//! HTML pages of the app.

use crate::model::Listing;
use wanderlust_core::template;

/// Skeleton shared by all pages.
const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.html");

/// Page that lists all listings.
const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Entry for a single listing within the index page.
const INDEX_ITEM_TEMPLATE: &str = include_str!("templates/index_item.html");

/// Page that shows the details of a listing.
const SHOW_TEMPLATE: &str = include_str!("templates/show.html");

/// Form to create a listing.
const NEW_TEMPLATE: &str = include_str!("templates/new.html");

/// Form to edit an existing listing.
const EDIT_TEMPLATE: &str = include_str!("templates/edit.html");

/// Wraps a rendered `body` in the layout shared by all pages.
fn page(title: &str, body: &str) -> String {
    template::apply(LAYOUT_TEMPLATE, &[("title", &template::escape(title)), ("body", body)])
}

/// Renders `input` with the contents of `listing`.
fn apply_listing(input: &'static str, listing: &Listing) -> String {
    let fields = listing.fields();
    template::apply(
        input,
        &[
            ("id", &listing.id().to_string()),
            ("title", &template::escape(fields.title())),
            ("description", &template::escape(fields.description())),
            ("image", &template::escape(fields.image())),
            ("price", &fields.price().to_string()),
            ("location", &template::escape(fields.location())),
            ("country", &template::escape(fields.country())),
        ],
    )
}

/// Renders the page with all `listings`.
pub(crate) fn index(listings: &[Listing]) -> String {
    let mut items = String::new();
    for listing in listings {
        items.push_str(&apply_listing(INDEX_ITEM_TEMPLATE, listing));
    }
    page("All Listings", &template::apply(INDEX_TEMPLATE, &[("items", &items)]))
}

/// Renders the form to create a listing.
pub(crate) fn new_form() -> String {
    page("New Listing", &template::apply(NEW_TEMPLATE, &[]))
}

/// Renders the details of `listing`.
pub(crate) fn show(listing: &Listing) -> String {
    page(listing.fields().title(), &apply_listing(SHOW_TEMPLATE, listing))
}

/// Renders the form to edit `listing`.
pub(crate) fn edit_form(listing: &Listing) -> String {
    page("Edit Listing", &apply_listing(EDIT_TEMPLATE, listing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListingFields, ListingId, Price};

    fn listing(title: &str) -> Listing {
        Listing::new(
            ListingId::generate(),
            ListingFields::new(
                title.to_owned(),
                "Cozy & warm".to_owned(),
                "https://example.com/a.jpg?w=1&h=2".to_owned(),
                Price::new(100.0).unwrap(),
                "Lake".to_owned(),
                "USA".to_owned(),
            ),
        )
    }

    #[test]
    fn test_index_empty() {
        let html = index(&[]);
        assert!(html.contains("<h3>All Listings</h3>"));
        assert!(!html.contains("listing-card"));
    }

    #[test]
    fn test_index_links_every_listing() {
        let first = listing("Cabin");
        let second = listing("Villa");
        let html = index(&[first.clone(), second.clone()]);
        assert!(html.contains(&format!("href=\"/listings/{}\"", first.id())));
        assert!(html.contains(&format!("href=\"/listings/{}\"", second.id())));
        assert!(html.find("Cabin").unwrap() < html.find("Villa").unwrap());
    }

    #[test]
    fn test_show_escapes_user_content() {
        let html = show(&listing("<script>alert(1)</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Cozy &amp; warm"));
        assert!(html.contains("src=\"https://example.com/a.jpg?w=1&amp;h=2\""));
    }

    #[test]
    fn test_edit_form_prefills_values() {
        let listing = listing("Cabin");
        let html = edit_form(&listing);
        assert!(html.contains(&format!("action=\"/listings/{}?_method=PUT\"", listing.id())));
        assert!(html.contains("value=\"Cabin\""));
        assert!(html.contains("value=\"100\""));
        assert!(html.contains(">Cozy &amp; warm</textarea>"));
    }

    #[test]
    fn test_new_form() {
        let html = new_form();
        assert!(html.contains("action=\"/listings\""));
        assert!(html.contains("name=\"listing[title]\""));
    }
}
