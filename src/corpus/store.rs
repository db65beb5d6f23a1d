// ABOUTME: Read access to recipes and ingredient lines through the discovered schema
// ABOUTME: Handles loose-JSON blob parsing and the naive text-splitting fallbacks
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recipe store
//!
//! All reads of the external corpus go through this type. Column names are
//! taken from the discovered [`CorpusSchema`]; they originate from fixed
//! candidate lists, so interpolating them into SQL is safe. User-supplied
//! values are always bound as parameters.

use super::schema::{CorpusSchema, LineTable};
use crate::errors::AppResult;
use crate::models::RecipeDetail;
use crate::search::tokenize::{split_blob_for_display, split_steps};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Read-only access to the recipe corpus
#[derive(Clone)]
pub struct RecipeStore {
    pool: SqlitePool,
    schema: Arc<CorpusSchema>,
}

impl RecipeStore {
    /// Create a store over an open pool and a discovered schema
    #[must_use]
    pub fn new(pool: SqlitePool, schema: Arc<CorpusSchema>) -> Self {
        Self { pool, schema }
    }

    /// The discovered schema backing this store
    #[must_use]
    pub fn schema(&self) -> &CorpusSchema {
        &self.schema
    }

    /// The underlying pool, shared with the indexer and engine
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Total number of recipes in the corpus
    pub async fn recipe_count(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS c FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("c")?)
    }

    /// Fetch full detail for one recipe, or `None` if the id is absent.
    ///
    /// Ingredient lines come from the line table when present (in stored
    /// order), otherwise from splitting the raw blob. Steps come from the
    /// steps blob, parsed as a JSON-ish array with a text-splitting fallback.
    pub async fn fetch_detail(&self, id: i64) -> AppResult<Option<RecipeDetail>> {
        let s = &self.schema;
        let minutes_sel = match &s.minutes_col {
            Some(col) => format!(", r.{col} AS minutes"),
            None => ", NULL AS minutes".to_string(),
        };
        let description_sel = match &s.description_col {
            Some(col) => format!(", r.{col} AS description"),
            None => ", NULL AS description".to_string(),
        };
        let steps_sel = match &s.steps_col {
            Some(col) => format!(", r.{col} AS steps"),
            None => ", NULL AS steps".to_string(),
        };
        let ingredients_sel = match &s.ingredients_col {
            Some(col) => format!(", r.{col} AS ings"),
            None => ", NULL AS ings".to_string(),
        };

        let sql = format!(
            "SELECT r.{id_col} AS id, COALESCE(r.{name_col}, '') AS name\
             {minutes_sel}{description_sel}{steps_sel}{ingredients_sel} \
             FROM recipes r WHERE r.{id_col} = ?",
            id_col = s.id_col,
            name_col = s.name_col,
        );

        let Some(row) = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await? else {
            return Ok(None);
        };

        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let minutes: Option<i64> = row.try_get("minutes")?;
        let description: Option<String> = row.try_get("description")?;
        let steps_raw: Option<String> = row.try_get("steps")?;
        let ings_raw: Option<String> = row.try_get("ings")?;

        let ingredients = if self.schema.has_ingredient_lines() {
            self.fetch_lines(id).await?
        } else {
            ings_raw.as_deref().map(parse_lines_blob).unwrap_or_default()
        };

        let steps = steps_raw.as_deref().map(parse_steps_blob).unwrap_or_default();

        let name = if name.trim().is_empty() {
            format!("Recipe #{id}")
        } else {
            name
        };

        Ok(Some(RecipeDetail {
            id,
            name,
            minutes,
            description,
            ingredients,
            steps,
            tags: Vec::new(),
        }))
    }

    /// Ordered ingredient lines of one recipe from the line table.
    /// Returns empty when the corpus has no line table.
    pub async fn fetch_lines(&self, recipe_id: i64) -> AppResult<Vec<String>> {
        let Some(LineTable {
            recipe_id_col,
            ingredient_col,
        }) = &self.schema.line_table
        else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {ingredient_col} AS ingredient FROM {table} \
             WHERE {recipe_id_col} = ? ORDER BY rowid",
            table = LineTable::NAME,
        );
        let rows = sqlx::query(&sql).bind(recipe_id).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("ingredient").map_err(Into::into))
            .collect()
    }

    /// All recipe ids with their raw ingredients blob (when the corpus has
    /// one), for index population.
    pub async fn fetch_index_rows(&self) -> AppResult<Vec<(i64, Option<String>)>> {
        let s = &self.schema;
        let blob_sel = match &s.ingredients_col {
            Some(col) => format!(", {col} AS ings"),
            None => ", NULL AS ings".to_string(),
        };
        let sql = format!("SELECT {id_col} AS id{blob_sel} FROM recipes", id_col = s.id_col);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get("id")?;
                let ings: Option<String> = row.try_get("ings")?;
                Ok((id, ings))
            })
            .collect()
    }
}

/// Parse a stored array blob leniently: strict JSON first, then a retry with
/// single quotes swapped for double quotes (corpus builds that serialized
/// Python lists), otherwise `None`.
#[must_use]
pub fn parse_loose_array(raw: &str) -> Option<Vec<String>> {
    let parse = |text: &str| {
        serde_json::from_str::<Vec<serde_json::Value>>(text)
            .ok()
            .map(|values| {
                values
                    .into_iter()
                    .map(|value| match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect::<Vec<String>>()
            })
    };
    parse(raw).or_else(|| parse(&raw.replace('\'', "\"")))
}

/// Ingredient lines from a raw blob: structured parse, degrading to display
/// splitting for anything unparseable.
fn parse_lines_blob(raw: &str) -> Vec<String> {
    parse_loose_array(raw).unwrap_or_else(|| split_blob_for_display(raw))
}

/// Steps from a raw blob: structured parse, degrading to sentence splitting.
fn parse_steps_blob(raw: &str) -> Vec<String> {
    parse_loose_array(raw).unwrap_or_else(|| split_steps(raw))
}
