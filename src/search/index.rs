// ABOUTME: Builds and refreshes the per-recipe token index and its count aggregate
// ABOUTME: One-time transactional population at startup; cheap aggregate refresh thereafter
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Token index
//!
//! Derived state owned by this service: `recipe_ing_tokens` holds the
//! deduplicated (`recipe_id`, `token`) pairs of every recipe's ingredient
//! lines, and `recipe_token_counts` holds the distinct-token count per recipe.
//! `rebuild` runs once, synchronously, before the service accepts traffic; it
//! is the only writer of derived state. If tokens already exist only the
//! aggregate is recomputed. Full population and the aggregate rebuild share
//! one transaction, so a crash mid-population leaves neither table half-built.

use crate::corpus::store::parse_loose_array;
use crate::corpus::{CorpusSchema, LineTable, RecipeStore};
use crate::errors::AppResult;
use crate::search::tokenize::{split_blob, tokenize};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// SQL rebuilding the count aggregate from the token table
const REFRESH_COUNTS_DELETE: &str = "DELETE FROM recipe_token_counts";
const REFRESH_COUNTS_INSERT: &str = "INSERT INTO recipe_token_counts (recipe_id, tok_total) \
     SELECT recipe_id, COUNT(DISTINCT token) FROM recipe_ing_tokens GROUP BY recipe_id";

/// Outcome of a rebuild, for startup logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// Tokens already existed; only the aggregate was recomputed
    Refreshed,
    /// Full one-time population ran
    Built {
        /// Recipes tokenized
        recipes: usize,
        /// Token rows written
        tokens: usize,
    },
}

/// The token index and its maintenance operations
#[derive(Clone)]
pub struct TokenIndex {
    pool: SqlitePool,
}

impl TokenIndex {
    /// Create an index handle over the corpus pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ensure the token tables exist and are populated.
    ///
    /// When token rows already exist the table is treated as populated and
    /// only the aggregate is recomputed. Otherwise every recipe's ingredient
    /// lines are gathered (line table preferred, blob splitting otherwise),
    /// tokenized, deduplicated per recipe and persisted together with the
    /// aggregate in a single transaction.
    ///
    /// # Errors
    /// Fails on storage errors. A malformed ingredients blob is not an error:
    /// that recipe degrades to naive text splitting and only its own penalty
    /// score is affected.
    pub async fn rebuild(&self, store: &RecipeStore) -> AppResult<RebuildOutcome> {
        self.ensure_tables().await?;

        let existing: i64 = sqlx::query("SELECT COUNT(*) AS c FROM recipe_ing_tokens")
            .fetch_one(&self.pool)
            .await?
            .try_get("c")?;

        if existing > 0 {
            let mut tx = self.pool.begin().await?;
            sqlx::query(REFRESH_COUNTS_DELETE).execute(&mut *tx).await?;
            sqlx::query(REFRESH_COUNTS_INSERT).execute(&mut *tx).await?;
            tx.commit().await?;
            debug!("Token index already populated; aggregate refreshed");
            return Ok(RebuildOutcome::Refreshed);
        }

        info!("Populating token index (one-time)");
        let rows = store.fetch_index_rows().await?;
        let recipes = rows.len();
        let mut tokens_written = 0usize;

        let mut tx = self.pool.begin().await?;
        for (recipe_id, blob) in rows {
            let lines = Self::gather_lines(&mut tx, store.schema(), recipe_id, blob.as_deref())
                .await?;
            let mut token_set = BTreeSet::new();
            for line in &lines {
                token_set.extend(tokenize(line));
            }
            for token in &token_set {
                sqlx::query("INSERT INTO recipe_ing_tokens (recipe_id, token) VALUES (?, ?)")
                    .bind(recipe_id)
                    .bind(token)
                    .execute(&mut *tx)
                    .await?;
            }
            tokens_written += token_set.len();
        }
        sqlx::query(REFRESH_COUNTS_DELETE).execute(&mut *tx).await?;
        sqlx::query(REFRESH_COUNTS_INSERT).execute(&mut *tx).await?;
        tx.commit().await?;

        info!(recipes, tokens = tokens_written, "Token index populated");
        Ok(RebuildOutcome::Built {
            recipes,
            tokens: tokens_written,
        })
    }

    /// Create token tables and indexes if absent
    async fn ensure_tables(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS recipe_ing_tokens (\
                 recipe_id INTEGER NOT NULL,\
                 token TEXT NOT NULL\
             )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tokens_token ON recipe_ing_tokens(token)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tokens_recipe ON recipe_ing_tokens(recipe_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS recipe_token_counts (\
                 recipe_id INTEGER PRIMARY KEY,\
                 tok_total INTEGER NOT NULL\
             )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Gather one recipe's ingredient lines inside the population transaction:
    /// the line table when present, otherwise the blob (structured parse,
    /// degrading to naive splitting).
    async fn gather_lines(
        tx: &mut Transaction<'_, Sqlite>,
        schema: &CorpusSchema,
        recipe_id: i64,
        blob: Option<&str>,
    ) -> AppResult<Vec<String>> {
        if let Some(LineTable {
            recipe_id_col,
            ingredient_col,
        }) = &schema.line_table
        {
            let sql = format!(
                "SELECT {ingredient_col} AS ingredient FROM {table} WHERE {recipe_id_col} = ?",
                table = LineTable::NAME,
            );
            let rows = sqlx::query(&sql).bind(recipe_id).fetch_all(&mut **tx).await?;
            return rows
                .iter()
                .map(|row| row.try_get::<String, _>("ingredient").map_err(Into::into))
                .collect();
        }

        let Some(raw) = blob else {
            return Ok(Vec::new());
        };
        Ok(parse_loose_array(raw).unwrap_or_else(|| split_blob(raw)))
    }
}
