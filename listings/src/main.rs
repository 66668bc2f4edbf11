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

//! Entry point to the listings service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use std::error::Error;
use std::net::Ipv4Addr;
use std::sync::Arc;
use wanderlust::db::init_schema;
use wanderlust::serve;
use wanderlust_core::db::{Db, sqlite};
use wanderlust_core::env::get_optional_var;

/// Prefix of all environment variables that configure the service.
const ENV_PREFIX: &str = "WANDERLUST";

/// Port to listen on when `WANDERLUST_PORT` is not set.
const DEFAULT_PORT: u16 = 8080;

/// Database to use when `WANDERLUST_DATABASE` is not set.
const DEFAULT_DATABASE: &str = "sqlite://wanderlust.db?mode=rwc";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let port = get_optional_var::<u16>(ENV_PREFIX, "PORT")?.unwrap_or(DEFAULT_PORT);
    let conn_str = get_optional_var::<String>(ENV_PREFIX, "DATABASE")?
        .unwrap_or_else(|| DEFAULT_DATABASE.to_owned());
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let db: Arc<dyn Db + Send + Sync> = Arc::new(sqlite::connect(&conn_str).await?);
    init_schema(&mut db.ex().await?).await?;

    let result = serve(addr, db.clone()).await;
    db.close().await;
    result
}
