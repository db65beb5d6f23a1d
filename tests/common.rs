// ABOUTME: Shared test utilities: seeded SQLite corpora and engine/router setup helpers
// ABOUTME: Provides line-table, blob-only and odd-schema corpus builders for integration tests
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![allow(dead_code)]

//! Shared test utilities for `pantry_recipe_api`
//!
//! Corpora are seeded into temp-dir SQLite files rather than `:memory:` so
//! that every pool connection sees the same database.

use anyhow::Result;
use pantry_recipe_api::corpus::{self, CorpusSchema, RecipeStore};
use pantry_recipe_api::routes::{self, AppState};
use pantry_recipe_api::search::engine::SearchEngine;
use pantry_recipe_api::search::index::TokenIndex;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Connection;
use std::str::FromStr;
use std::sync::{Arc, Once};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// A recipe to seed into a test corpus
#[derive(Debug, Clone, Default)]
pub struct TestRecipe {
    pub id: i64,
    pub name: &'static str,
    pub minutes: Option<i64>,
    pub description: Option<&'static str>,
    /// JSON-ish steps blob, stored verbatim
    pub steps: Option<&'static str>,
    /// Raw ingredients blob, stored verbatim
    pub ingredients_blob: Option<&'static str>,
    /// Discrete ingredient lines for the line table
    pub lines: Vec<&'static str>,
}

/// A seeded corpus; dropping it deletes the database file
pub struct SeededCorpus {
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl SeededCorpus {
    /// Discover schema and wire up store, engine and token index
    pub async fn setup(&self) -> Result<(RecipeStore, SearchEngine, TokenIndex)> {
        let schema = Arc::new(CorpusSchema::discover(&self.pool).await?);
        let store = RecipeStore::new(self.pool.clone(), schema.clone());
        let engine = SearchEngine::new(self.pool.clone(), schema);
        let index = TokenIndex::new(self.pool.clone());
        Ok((store, engine, index))
    }

    /// Setup plus a built token index; the common case
    pub async fn setup_indexed(&self) -> Result<(RecipeStore, SearchEngine)> {
        let (store, engine, index) = self.setup().await?;
        index.rebuild(&store).await?;
        Ok((store, engine))
    }

    /// Full application router over a built index, for route-level tests
    pub async fn router(&self) -> Result<axum::Router> {
        let (store, engine) = self.setup_indexed().await?;
        Ok(routes::router(Arc::new(AppState::new(store, engine))))
    }
}

/// Create a fresh corpus file and run the DDL + seed rows through one
/// connection, then reopen it through the production pool path.
async fn seed(ddl_and_rows: Vec<String>) -> Result<SeededCorpus> {
    init_test_logging();
    let dir = TempDir::new()?;
    let url = format!("sqlite://{}", dir.path().join("corpus.db").display());

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    let mut conn = sqlx::SqliteConnection::connect_with(&options).await?;
    for statement in ddl_and_rows {
        sqlx::query(&statement).execute(&mut conn).await?;
    }
    conn.close().await?;

    let pool = corpus::connect(&url).await?;
    Ok(SeededCorpus { pool, _dir: dir })
}

fn sql_str(value: Option<&str>) -> String {
    value.map_or_else(
        || "NULL".to_string(),
        |v| format!("'{}'", v.replace('\'', "''")),
    )
}

fn sql_i64(value: Option<i64>) -> String {
    value.map_or_else(|| "NULL".to_string(), |v| v.to_string())
}

/// Corpus with the preferred shape: standard column names plus a discrete
/// ingredient-line table.
pub async fn create_line_corpus(recipes: &[TestRecipe]) -> Result<SeededCorpus> {
    let mut statements = vec![
        "CREATE TABLE recipes (\
             id INTEGER PRIMARY KEY,\
             name TEXT,\
             minutes INTEGER,\
             description TEXT,\
             steps TEXT,\
             ingredients TEXT\
         )"
        .to_string(),
        "CREATE TABLE recipe_ingredients (recipe_id INTEGER, ingredient TEXT)".to_string(),
    ];
    for recipe in recipes {
        statements.push(format!(
            "INSERT INTO recipes (id, name, minutes, description, steps, ingredients) \
             VALUES ({}, {}, {}, {}, {}, {})",
            recipe.id,
            sql_str(Some(recipe.name)),
            sql_i64(recipe.minutes),
            sql_str(recipe.description),
            sql_str(recipe.steps),
            sql_str(recipe.ingredients_blob),
        ));
        for line in &recipe.lines {
            statements.push(format!(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient) VALUES ({}, {})",
                recipe.id,
                sql_str(Some(line)),
            ));
        }
    }
    seed(statements).await
}

/// Corpus carrying only a raw ingredients blob: no line table, no minutes.
/// Exercises the token-membership fallback and blob splitting.
pub async fn create_blob_corpus(recipes: &[TestRecipe]) -> Result<SeededCorpus> {
    let mut statements = vec![
        "CREATE TABLE recipes (id INTEGER PRIMARY KEY, name TEXT, ingredients TEXT)".to_string(),
    ];
    for recipe in recipes {
        statements.push(format!(
            "INSERT INTO recipes (id, name, ingredients) VALUES ({}, {}, {})",
            recipe.id,
            sql_str(Some(recipe.name)),
            sql_str(recipe.ingredients_blob),
        ));
    }
    seed(statements).await
}

/// Corpus using alternate physical column names (`i`, `title`, `time`,
/// `directions`, `summary`; line table with `rid`/`item`), for schema
/// discovery tests.
pub async fn create_variant_schema_corpus(recipes: &[TestRecipe]) -> Result<SeededCorpus> {
    let mut statements = vec![
        "CREATE TABLE recipes (\
             i INTEGER PRIMARY KEY,\
             title TEXT,\
             time INTEGER,\
             summary TEXT,\
             directions TEXT\
         )"
        .to_string(),
        "CREATE TABLE recipe_ingredients (rid INTEGER, item TEXT)".to_string(),
    ];
    for recipe in recipes {
        statements.push(format!(
            "INSERT INTO recipes (i, title, time, summary, directions) \
             VALUES ({}, {}, {}, {}, {})",
            recipe.id,
            sql_str(Some(recipe.name)),
            sql_i64(recipe.minutes),
            sql_str(recipe.description),
            sql_str(recipe.steps),
        ));
        for line in &recipe.lines {
            statements.push(format!(
                "INSERT INTO recipe_ingredients (rid, item) VALUES ({}, {})",
                recipe.id,
                sql_str(Some(line)),
            ));
        }
    }
    seed(statements).await
}

/// Corpus with no usable recipe id column; discovery must fail on it.
pub async fn create_broken_corpus() -> Result<SeededCorpus> {
    seed(vec![
        "CREATE TABLE recipes (slug TEXT PRIMARY KEY, name TEXT)".to_string(),
        "INSERT INTO recipes (slug, name) VALUES ('x', 'Unreachable')".to_string(),
    ])
    .await
}
