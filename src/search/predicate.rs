// ABOUTME: Storage-agnostic admissibility predicates over ingredient lines
// ABOUTME: Tagged predicate tree with an in-memory evaluator and a SQLite LIKE compiler
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Admissibility predicates
//!
//! MUST/EXCLUDE term lists compile to a predicate tree rather than directly to
//! a storage query, so the same tree can be evaluated two ways: against an
//! in-memory list of ingredient lines (unit tests, no storage engine), or
//! compiled to `SQLite` `LIKE` clauses with bound parameters for the real
//! search query.
//!
//! Semantics of a leaf: "some ingredient line of the recipe contains this
//! variant" — context-guarded for MUST/OPTIONAL variants, broad for EXCLUDE.
//! MUST is a conjunction across terms of disjunctions across variants;
//! EXCLUDE pools all variants of all terms into one disjunction, which the
//! engine negates at the recipe level.

use super::expand::expand;
use super::guard::{line_matches_broad, line_matches_guarded, DISALLOWED_FOLLOW};

/// A recipe-admissibility predicate over the recipe's ingredient lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Every child predicate must hold
    And(Vec<Predicate>),
    /// At least one child predicate must hold
    Or(Vec<Predicate>),
    /// Some ingredient line contains the variant; `guarded` applies the
    /// context guard to each line
    LineContains { variant: String, guarded: bool },
}

impl Predicate {
    /// MUST tree: for every term, at least one line matches at least one
    /// variant (conjunction across terms, disjunction across variants).
    /// An empty term list yields `And([])`, which is vacuously true.
    #[must_use]
    pub fn must(terms: &[String]) -> Self {
        Self::And(
            terms
                .iter()
                .map(|term| {
                    Self::Or(
                        expand(term)
                            .into_iter()
                            .map(|variant| Self::LineContains {
                                variant,
                                guarded: true,
                            })
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    /// EXCLUDE tree: any line matching any variant of any term, unguarded.
    /// Variants are pooled across terms. The engine negates this at the
    /// recipe level. An empty term list yields `Or([])`, which is false.
    #[must_use]
    pub fn exclude(terms: &[String]) -> Self {
        Self::Or(
            super::expand::expand_all(terms)
                .into_iter()
                .map(|variant| Self::LineContains {
                    variant,
                    guarded: false,
                })
                .collect(),
        )
    }

    /// OPTIONAL tree: any line matching any variant of any term, guarded.
    /// Used per-line for match counting, not for admissibility.
    #[must_use]
    pub fn optional(terms: &[String]) -> Self {
        Self::Or(
            super::expand::expand_all(terms)
                .into_iter()
                .map(|variant| Self::LineContains {
                    variant,
                    guarded: true,
                })
                .collect(),
        )
    }

    /// True when the predicate has no leaves (trivial).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(children) | Self::Or(children) => children.iter().all(Self::is_empty),
            Self::LineContains { .. } => false,
        }
    }

    /// Evaluate against a recipe's ingredient lines.
    #[must_use]
    pub fn eval(&self, lines: &[String]) -> bool {
        match self {
            Self::And(children) => children.iter().all(|child| child.eval(lines)),
            Self::Or(children) => children.iter().any(|child| child.eval(lines)),
            Self::LineContains { variant, guarded } => lines.iter().any(|line| {
                if *guarded {
                    line_matches_guarded(line, variant)
                } else {
                    line_matches_broad(line, variant)
                }
            }),
        }
    }

    /// Evaluate against one ingredient line (used for per-line match counts).
    #[must_use]
    pub fn eval_line(&self, line: &str) -> bool {
        match self {
            Self::And(children) => children.iter().all(|child| child.eval_line(line)),
            Self::Or(children) => children.iter().any(|child| child.eval_line(line)),
            Self::LineContains { variant, guarded } => {
                if *guarded {
                    line_matches_guarded(line, variant)
                } else {
                    line_matches_broad(line, variant)
                }
            }
        }
    }

    /// Compile to a recipe-level SQL condition against an ingredient-line
    /// table. Each leaf becomes an `EXISTS` subquery correlated on the outer
    /// recipe id expression; variants are bound as parameters, never
    /// interpolated.
    ///
    /// `table`, `recipe_id_col` and `ingredient_col` come from schema
    /// discovery, `outer_id_expr` names the recipe id of the enclosing query
    /// (e.g. `r.id`).
    #[must_use]
    pub fn to_recipe_sql(
        &self,
        table: &str,
        recipe_id_col: &str,
        ingredient_col: &str,
        outer_id_expr: &str,
        params: &mut Vec<String>,
    ) -> String {
        match self {
            Self::And(children) => {
                join_children(children, " AND ", "1=1", |child| {
                    child.to_recipe_sql(table, recipe_id_col, ingredient_col, outer_id_expr, params)
                })
            }
            Self::Or(children) => {
                join_children(children, " OR ", "1=0", |child| {
                    child.to_recipe_sql(table, recipe_id_col, ingredient_col, outer_id_expr, params)
                })
            }
            Self::LineContains { .. } => {
                let line_condition = self.leaf_line_sql(&format!("ri.{ingredient_col}"), params);
                format!(
                    "EXISTS (SELECT 1 FROM {table} ri \
                     WHERE ri.{recipe_id_col} = {outer_id_expr} AND {line_condition})"
                )
            }
        }
    }

    /// Compile to a line-level SQL condition for queries that scan the line
    /// table directly (the optional-match counting pass).
    #[must_use]
    pub fn to_line_sql(&self, ingredient_expr: &str, params: &mut Vec<String>) -> String {
        match self {
            Self::And(children) => join_children(children, " AND ", "1=1", |child| {
                child.to_line_sql(ingredient_expr, params)
            }),
            Self::Or(children) => join_children(children, " OR ", "1=0", |child| {
                child.to_line_sql(ingredient_expr, params)
            }),
            Self::LineContains { .. } => self.leaf_line_sql(ingredient_expr, params),
        }
    }

    /// SQL for one leaf against a line expression: a `LIKE` containment probe
    /// plus, when guarded, one `NOT LIKE` per disqualifying continuation.
    fn leaf_line_sql(&self, ingredient_expr: &str, params: &mut Vec<String>) -> String {
        let Self::LineContains { variant, guarded } = self else {
            unreachable!("leaf_line_sql called on a non-leaf predicate");
        };
        let mut condition = format!("LOWER({ingredient_expr}) LIKE '%' || ? || '%'");
        params.push(variant.clone());
        if *guarded {
            for follow in DISALLOWED_FOLLOW {
                condition.push_str(&format!(
                    " AND LOWER({ingredient_expr}) NOT LIKE '%' || ? || '{follow}%'"
                ));
                params.push(variant.clone());
            }
        }
        format!("({condition})")
    }
}

/// Join compiled children with a connective, or emit a constant for the
/// trivial case (`1=1` for empty AND, `1=0` for empty OR).
fn join_children<F>(children: &[Predicate], sep: &str, empty: &str, mut compile: F) -> String
where
    F: FnMut(&Predicate) -> String,
{
    if children.is_empty() {
        return empty.to_string();
    }
    let parts: Vec<String> = children.iter().map(&mut compile).collect();
    format!("({})", parts.join(sep))
}
