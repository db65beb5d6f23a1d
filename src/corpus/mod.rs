// ABOUTME: External recipe corpus boundary: connection, schema discovery and read access
// ABOUTME: The core never branches on physical shape; everything flows through CorpusSchema
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Corpus access
//!
//! The recipe store is created and owned outside this service and its physical
//! shape varies: column names differ between corpus builds, the ingredient-line
//! table may be absent, the duration column may be absent. Schema discovery
//! runs once at startup and produces a fixed logical mapping; all reads go
//! through [`store::RecipeStore`] using that mapping.

/// One-time physical schema discovery
pub mod schema;

/// Read access to recipes and ingredient lines
pub mod store;

pub use schema::{CorpusSchema, LineTable};
pub use store::RecipeStore;

use crate::errors::AppResult;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;

/// Open a pool on the corpus database.
///
/// WAL journaling with normal synchronous writes: the one-time index build is
/// the only writer and readers are never blocked by it.
///
/// # Errors
/// Returns a database error if the URL is malformed or the file cannot be
/// opened.
pub async fn connect(database_url: &str) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(false)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;
    Ok(pool)
}
