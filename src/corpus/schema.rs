// ABOUTME: One-time discovery of the corpus's physical schema into a fixed logical mapping
// ABOUTME: Probes sqlite_master and table_info for the columns holding each logical field
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Schema discovery
//!
//! Corpus builds disagree on column names: the id column may be `id`, `i` or
//! `recipe_id`; the duration column may be `minutes`, `time`, `total_minutes`
//! or `cook_time`, or missing entirely. Discovery probes the physical schema
//! once and fixes the mapping for the life of the process. A corpus without an
//! identifiable recipe id is unusable and discovery fails, which is
//! startup-fatal.

use crate::errors::{AppError, AppResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Candidate columns for the recipe id (required)
const ID_CANDIDATES: [&str; 3] = ["id", "i", "recipe_id"];
/// Candidate columns for the display name
const NAME_CANDIDATES: [&str; 2] = ["name", "title"];
/// Candidate columns for duration in minutes
const MINUTES_CANDIDATES: [&str; 4] = ["minutes", "time", "total_minutes", "cook_time"];
/// Candidate columns for the raw ingredients blob
const INGREDIENTS_CANDIDATES: [&str; 1] = ["ingredients"];
/// Candidate columns for the steps blob
const STEPS_CANDIDATES: [&str; 2] = ["steps", "directions"];
/// Candidate columns for the description
const DESCRIPTION_CANDIDATES: [&str; 3] = ["description", "desc", "summary"];
/// Candidate columns for the line table's recipe id
const LINE_RECIPE_ID_CANDIDATES: [&str; 3] = ["recipe_id", "rid", "id"];
/// Candidate columns for the line table's ingredient text
const LINE_INGREDIENT_CANDIDATES: [&str; 3] = ["ingredient", "ing", "item"];

/// The discovered ingredient-line table, when the corpus has one
#[derive(Debug, Clone)]
pub struct LineTable {
    /// Column holding the owning recipe id
    pub recipe_id_col: String,
    /// Column holding the ingredient line text
    pub ingredient_col: String,
}

impl LineTable {
    /// Physical table name; fixed across corpus builds
    pub const NAME: &'static str = "recipe_ingredients";
}

/// Fixed logical-field mapping for the bound corpus
#[derive(Debug, Clone)]
pub struct CorpusSchema {
    /// Column holding the recipe id
    pub id_col: String,
    /// Column holding the display name
    pub name_col: String,
    /// Column holding duration in minutes, when present
    pub minutes_col: Option<String>,
    /// Column holding the free-text description, when present
    pub description_col: Option<String>,
    /// Column holding the steps blob, when present
    pub steps_col: Option<String>,
    /// Column holding the raw ingredients blob, when present
    pub ingredients_col: Option<String>,
    /// The discrete ingredient-line table, when present (preferred)
    pub line_table: Option<LineTable>,
}

impl CorpusSchema {
    /// Discover the physical schema of the bound corpus.
    ///
    /// # Errors
    /// Fails if the `recipes` table is missing or carries no identifiable id
    /// column; the service must refuse to start in that case.
    pub async fn discover(pool: &SqlitePool) -> AppResult<Self> {
        if !table_exists(pool, "recipes").await? {
            return Err(AppError::config("recipes table not found in corpus"));
        }

        let recipe_cols = columns_of(pool, "recipes").await?;
        let id_col = pick_col(&recipe_cols, &ID_CANDIDATES).ok_or_else(|| {
            AppError::config(format!(
                "No recipe id column in recipes table: tried {}",
                ID_CANDIDATES.join(", ")
            ))
        })?;
        let name_col =
            pick_col(&recipe_cols, &NAME_CANDIDATES).unwrap_or_else(|| "name".to_string());
        let minutes_col = pick_col(&recipe_cols, &MINUTES_CANDIDATES);
        let description_col = pick_col(&recipe_cols, &DESCRIPTION_CANDIDATES);
        let steps_col = pick_col(&recipe_cols, &STEPS_CANDIDATES);
        let ingredients_col = pick_col(&recipe_cols, &INGREDIENTS_CANDIDATES);

        let line_table = if table_exists(pool, LineTable::NAME).await? {
            let line_cols = columns_of(pool, LineTable::NAME).await?;
            let recipe_id_col =
                pick_col(&line_cols, &LINE_RECIPE_ID_CANDIDATES).ok_or_else(|| {
                    AppError::config(format!(
                        "No recipe id column in {}: tried {}",
                        LineTable::NAME,
                        LINE_RECIPE_ID_CANDIDATES.join(", ")
                    ))
                })?;
            let ingredient_col =
                pick_col(&line_cols, &LINE_INGREDIENT_CANDIDATES).ok_or_else(|| {
                    AppError::config(format!(
                        "No ingredient column in {}: tried {}",
                        LineTable::NAME,
                        LINE_INGREDIENT_CANDIDATES.join(", ")
                    ))
                })?;
            Some(LineTable {
                recipe_id_col,
                ingredient_col,
            })
        } else {
            None
        };

        let schema = Self {
            id_col,
            name_col,
            minutes_col,
            description_col,
            steps_col,
            ingredients_col,
            line_table,
        };
        info!(
            id = %schema.id_col,
            name = %schema.name_col,
            has_minutes = schema.has_minutes(),
            has_lines = schema.has_ingredient_lines(),
            "Corpus schema discovered"
        );
        Ok(schema)
    }

    /// Whether the corpus carries a duration field (enables time sorting)
    #[must_use]
    pub const fn has_minutes(&self) -> bool {
        self.minutes_col.is_some()
    }

    /// Whether the corpus carries a discrete ingredient-line table
    #[must_use]
    pub const fn has_ingredient_lines(&self) -> bool {
        self.line_table.is_some()
    }
}

/// Whether a table or view with this name exists
async fn table_exists(pool: &SqlitePool, name: &str) -> AppResult<bool> {
    let row = sqlx::query(
        "SELECT name FROM sqlite_master WHERE type IN ('table','view') AND name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

/// All column names of a table. The table name comes from our own fixed
/// candidate set, never from user input.
async fn columns_of(pool: &SqlitePool, table: &str) -> AppResult<Vec<String>> {
    let rows = sqlx::query(&format!("PRAGMA table_info('{table}')"))
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| row.try_get::<String, _>("name").map_err(Into::into))
        .collect()
}

/// First candidate present among the table's columns
fn pick_col(columns: &[String], candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| columns.iter().any(|col| col == *candidate))
        .map(ToString::to_string)
}
