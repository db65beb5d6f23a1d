// ABOUTME: The ranked search pipeline: normalize, filter, score, sort, paginate
// ABOUTME: Compiles predicates into one SQL pass over the corpus and token index
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Search engine
//!
//! A request's three term lists are normalized and expanded, compiled into
//! admissibility predicates and evaluated in a single SQL pass:
//!
//! - `base` applies MUST and EXCLUDE admissibility
//! - `opt_hits` counts, per recipe, the distinct ingredient lines matching
//!   any OPTIONAL variant (context-guarded)
//! - `outside` counts each admissible recipe's tokens that fall outside the
//!   allowed vocabulary — the missing penalty
//!
//! `must_matched` is the number of MUST terms in the request, constant across
//! returned rows: MUST is all-or-nothing, a recipe failing any term is not in
//! `base` at all. When the corpus has no ingredient-line table, MUST and
//! EXCLUDE fall back to token-membership tests against the index and OPTIONAL
//! counts are zero.

use crate::corpus::{CorpusSchema, LineTable};
use crate::errors::{AppError, AppResult};
use crate::models::{SearchRequest, SearchRow, SortMode};
use crate::search::expand::expand;
use crate::search::predicate::Predicate;
use crate::search::vocab::allowed_vocabulary;
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Upper bound on page size
const LIMIT_MAX: i64 = 200;
/// Default page size
const LIMIT_DEFAULT: i64 = 50;

/// Ranked search over the corpus and token index
#[derive(Clone)]
pub struct SearchEngine {
    pool: SqlitePool,
    schema: Arc<CorpusSchema>,
}

impl SearchEngine {
    /// Create an engine over the corpus pool and discovered schema
    #[must_use]
    pub fn new(pool: SqlitePool, schema: Arc<CorpusSchema>) -> Self {
        Self { pool, schema }
    }

    /// Evaluate one search request against the current index snapshot.
    ///
    /// Pure reader: never mutates recipe, line, token or count data. Any
    /// storage fault surfaces as a single search-failed error; no partial
    /// result list is returned.
    ///
    /// # Errors
    /// Returns a search-failed error carrying the storage diagnostic.
    pub async fn search(&self, request: &SearchRequest) -> AppResult<Vec<SearchRow>> {
        let must = normalize_terms(&request.must);
        let optional = normalize_terms(&request.optional);
        let exclude = normalize_terms(&request.exclude);

        let limit = clamp_limit(request.limit);
        let offset = clamp_offset(request.offset);
        let sort = effective_sort(request.sort, self.schema.has_minutes());

        let allowed: Vec<String> = allowed_vocabulary(&must, &optional).into_iter().collect();

        let mut params: Vec<String> = Vec::new();
        let (must_where, exclude_where) = self.admissibility_sql(&must, &exclude, &mut params);
        let opt_cte = self.optional_cte_sql(&optional, &mut params);
        params.extend(allowed.iter().cloned());

        let minutes_sel = match &self.schema.minutes_col {
            Some(col) => format!("r.{col} AS minutes"),
            None => "NULL AS minutes".to_string(),
        };
        let allowed_placeholders = vec!["?"; allowed.len()].join(", ");
        let order = order_clause(sort, self.schema.has_minutes());

        let sql = format!(
            "WITH base AS (\
                 SELECT r.{id_col} AS id, COALESCE(r.{name_col}, '') AS name, {minutes_sel} \
                 FROM recipes r \
                 WHERE {must_where} AND {exclude_where}\
             ), {opt_cte}, \
             outside AS (\
                 SELECT b.id, COUNT(DISTINCT t.token) AS outside_count \
                 FROM base b \
                 JOIN recipe_ing_tokens t ON t.recipe_id = b.id \
                 WHERE t.token NOT IN ({allowed_placeholders}) \
                 GROUP BY b.id\
             ) \
             SELECT b.id, b.name, b.minutes, \
                    {must_count} AS must_matched, \
                    COALESCE(oh.matched, 0) AS opt_matched, \
                    COALESCE(o.outside_count, 0) AS missing_penalty \
             FROM base b \
             LEFT JOIN opt_hits oh ON oh.recipe_id = b.id \
             LEFT JOIN outside o ON o.id = b.id \
             ORDER BY {order} \
             LIMIT ? OFFSET ?",
            id_col = self.schema.id_col,
            name_col = self.schema.name_col,
            must_count = must.len(),
        );
        debug!(
            must = must.len(),
            optional = optional.len(),
            exclude = exclude.len(),
            ?sort,
            "Evaluating search"
        );

        let mut query = sqlx::query(&sql);
        for param in &params {
            query = query.bind(param);
        }
        query = query.bind(limit).bind(offset);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::search_failed(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get("id")?;
                let name: String = row.try_get("name")?;
                let name = if name.trim().is_empty() {
                    format!("Recipe #{id}")
                } else {
                    name
                };
                Ok(SearchRow {
                    id,
                    name,
                    minutes: row.try_get("minutes")?,
                    must_matched: row.try_get("must_matched")?,
                    opt_matched: row.try_get("opt_matched")?,
                    missing_penalty: row.try_get("missing_penalty")?,
                })
            })
            .collect()
    }

    /// MUST and EXCLUDE where-clauses for the `base` CTE. Line-table
    /// predicates when the corpus has discrete lines, token-membership
    /// fallback otherwise.
    fn admissibility_sql(
        &self,
        must: &[String],
        exclude: &[String],
        params: &mut Vec<String>,
    ) -> (String, String) {
        let outer_id = format!("r.{}", self.schema.id_col);

        if let Some(LineTable {
            recipe_id_col,
            ingredient_col,
        }) = &self.schema.line_table
        {
            let must_where = Predicate::must(must).to_recipe_sql(
                LineTable::NAME,
                recipe_id_col,
                ingredient_col,
                &outer_id,
                params,
            );
            let exclude_pred = Predicate::exclude(exclude);
            let exclude_where = if exclude_pred.is_empty() {
                "1=1".to_string()
            } else {
                let inner = exclude_pred.to_recipe_sql(
                    LineTable::NAME,
                    recipe_id_col,
                    ingredient_col,
                    &outer_id,
                    params,
                );
                format!("NOT {inner}")
            };
            return (must_where, exclude_where);
        }

        // Token fallback: admissibility via index membership, one EXISTS per
        // MUST term over that term's own expansion set.
        let must_where = if must.is_empty() {
            "1=1".to_string()
        } else {
            must.iter()
                .map(|term| {
                    let variants = expand(term);
                    let placeholders = vec!["?"; variants.len()].join(", ");
                    params.extend(variants);
                    format!(
                        "EXISTS (SELECT 1 FROM recipe_ing_tokens t \
                         WHERE t.recipe_id = {outer_id} AND t.token IN ({placeholders}))"
                    )
                })
                .collect::<Vec<_>>()
                .join(" AND ")
        };

        let exclude_variants = crate::search::expand::expand_all(exclude);
        let exclude_where = if exclude_variants.is_empty() {
            "1=1".to_string()
        } else {
            let placeholders = vec!["?"; exclude_variants.len()].join(", ");
            params.extend(exclude_variants);
            format!(
                "NOT EXISTS (SELECT 1 FROM recipe_ing_tokens t \
                 WHERE t.recipe_id = {outer_id} AND t.token IN ({placeholders}))"
            )
        };

        (must_where, exclude_where)
    }

    /// The `opt_hits` CTE: per-recipe count of distinct lines matching any
    /// OPTIONAL variant. Degenerates to an empty relation when there are no
    /// OPTIONAL terms or no line table.
    fn optional_cte_sql(&self, optional: &[String], params: &mut Vec<String>) -> String {
        let Some(LineTable {
            recipe_id_col,
            ingredient_col,
        }) = &self.schema.line_table
        else {
            return empty_opt_cte();
        };
        if optional.is_empty() {
            return empty_opt_cte();
        }

        let condition = Predicate::optional(optional)
            .to_line_sql(&format!("ri.{ingredient_col}"), params);
        format!(
            "opt_hits AS (\
                 SELECT ri.{recipe_id_col} AS recipe_id, \
                        COUNT(DISTINCT LOWER(ri.{ingredient_col})) AS matched \
                 FROM {table} ri \
                 WHERE {condition} \
                 GROUP BY ri.{recipe_id_col}\
             )",
            table = LineTable::NAME,
        )
    }
}

/// The empty `opt_hits` relation
fn empty_opt_cte() -> String {
    "opt_hits AS (SELECT NULL AS recipe_id, 0 AS matched WHERE 1=0)".to_string()
}

/// Trim, lowercase, drop empties and deduplicate, preserving first-seen order.
#[must_use]
pub fn normalize_terms(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Clamp the page size to `1..=200`, defaulting to 50.
#[must_use]
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(LIMIT_DEFAULT).clamp(1, LIMIT_MAX)
}

/// Clamp the offset to `>= 0`, defaulting to 0.
#[must_use]
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Time sorts require a duration field; without one they silently degrade to
/// match order. The client learns the capability from `/health`.
#[must_use]
pub fn effective_sort(requested: Option<SortMode>, has_minutes: bool) -> SortMode {
    let sort = requested.unwrap_or_default();
    match sort {
        SortMode::TimeAsc | SortMode::TimeDesc if !has_minutes => SortMode::Match,
        other => other,
    }
}

/// ORDER BY body for a sort mode. Always ends with the name tiebreak, so the
/// order is total; `minutes IS NULL` sorts null durations last.
fn order_clause(sort: SortMode, has_minutes: bool) -> String {
    match sort {
        SortMode::Match => {
            let time_tiebreak = if has_minutes {
                "minutes IS NULL, minutes ASC, "
            } else {
                ""
            };
            format!(
                "missing_penalty ASC, must_matched DESC, opt_matched DESC, {time_tiebreak}name ASC"
            )
        }
        SortMode::TimeAsc => {
            "minutes IS NULL, minutes ASC, missing_penalty ASC, name ASC".to_string()
        }
        SortMode::TimeDesc => {
            "minutes IS NULL, minutes DESC, missing_penalty ASC, name ASC".to_string()
        }
    }
}
