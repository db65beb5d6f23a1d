// ABOUTME: Wire types for the search, recipe detail and health endpoints
// ABOUTME: Serde request/response structs shared by routes, engine and integration tests
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Request and response types for the HTTP API

use serde::{Deserialize, Serialize};

/// Result ordering for a search request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Best match first: missing penalty ascending, then matched counts descending
    #[default]
    Match,
    /// Shortest duration first, nulls last; ignored when the corpus has no duration field
    TimeAsc,
    /// Longest duration first, nulls last; ignored when the corpus has no duration field
    TimeDesc,
}

/// Search request body
///
/// All three term lists default to empty. Entries are trimmed and lowercased
/// before processing, and duplicates after normalization are removed.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchRequest {
    /// Ingredients every result must contain (context-guarded match required)
    #[serde(default)]
    pub must: Vec<String>,
    /// Ingredients that improve ranking if present but are not required
    #[serde(default)]
    pub optional: Vec<String>,
    /// Ingredients whose presence (broad match) disqualifies a recipe
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Maximum rows to return, clamped to 1..=200 (default 50)
    pub limit: Option<i64>,
    /// Rows to skip after sorting, clamped to >= 0 (default 0)
    pub offset: Option<i64>,
    /// Result ordering (default `match`)
    pub sort: Option<SortMode>,
}

/// One ranked search result row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRow {
    /// Recipe identifier
    pub id: i64,
    /// Display name, never empty (synthesized as `Recipe #<id>` when blank)
    pub name: String,
    /// Duration in minutes when the corpus carries one
    pub minutes: Option<i64>,
    /// Number of MUST terms in the request; constant across returned rows
    pub must_matched: i64,
    /// Distinct ingredient lines matching any OPTIONAL term variant
    pub opt_matched: i64,
    /// Distinct recipe tokens outside the allowed vocabulary
    pub missing_penalty: i64,
}

/// Recipe detail response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Recipe identifier
    pub id: i64,
    /// Display name, never empty (synthesized as `Recipe #<id>` when blank)
    pub name: String,
    /// Duration in minutes when the corpus carries one
    pub minutes: Option<i64>,
    /// Free-text description when the corpus carries one
    pub description: Option<String>,
    /// Ordered ingredient lines
    pub ingredients: Vec<String>,
    /// Ordered instruction steps
    pub steps: Vec<String>,
    /// Always empty; reserved for a future collaborator
    pub tags: Vec<String>,
}

/// Health/status response
///
/// The capability flags tell the client which sort modes to offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Whether the service is up and the corpus is reachable
    pub ok: bool,
    /// Total recipe count in the bound corpus
    pub recipes: i64,
    /// Whether the corpus carries a duration field
    pub has_minutes: bool,
    /// Whether the corpus carries a discrete ingredient-line table
    pub has_ingredient_lines: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&SortMode::TimeAsc).unwrap(),
            "\"time_asc\""
        );
        let parsed: SortMode = serde_json::from_str("\"time_desc\"").unwrap();
        assert_eq!(parsed, SortMode::TimeDesc);
    }

    #[test]
    fn test_search_request_defaults() {
        let request: SearchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.must.is_empty());
        assert!(request.optional.is_empty());
        assert!(request.exclude.is_empty());
        assert!(request.limit.is_none());
        assert!(request.sort.is_none());
    }

    #[test]
    fn test_search_row_roundtrip() {
        let row = SearchRow {
            id: 7,
            name: "Recipe #7".into(),
            minutes: None,
            must_matched: 2,
            opt_matched: 1,
            missing_penalty: 3,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"minutes\":null"));
        let back: SearchRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
