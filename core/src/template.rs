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

//! Trivial template rendering for HTML pages.

/// Applies `replacements` to a template `input`.
///
/// The template contains variables of the form `%key%`, which are replaced by the value of the
/// matching `key` in `replacements`.  A literal `%` is written as `%%`.  Replacement values are
/// inserted verbatim, so callers must pass them through `escape` first unless they are trusted
/// HTML fragments.
///
/// Panics if a variable in the template has no replacement or has more than one.
pub fn apply(input: &'static str, replacements: &[(&'static str, &str)]) -> String {
    let chunks = input.split('%').collect::<Vec<&str>>();
    assert!(chunks.len() % 2 == 1, "Unterminated variable in template");

    let mut output = String::with_capacity(input.len());
    for (i, chunk) in chunks.into_iter().enumerate() {
        if i % 2 == 0 {
            output.push_str(chunk);
        } else if chunk.is_empty() {
            output.push('%');
        } else {
            let mut values = replacements.iter().filter(|(key, _)| *key == chunk);
            match (values.next(), values.next()) {
                (Some((_, value)), None) => output.push_str(value),
                (Some(_), Some(_)) => panic!("Found two values for replacement {}", chunk),
                (None, _) => panic!("No replacement for {} but it must have been defined", chunk),
            }
        }
    }
    output
}

/// Escapes `input` so that it can be placed in HTML text or in a quoted attribute value.
pub fn escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            ch => output.push(ch),
        }
    }
    output
}
