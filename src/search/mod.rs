// ABOUTME: The ingredient-matching and ranking engine
// ABOUTME: Term expansion, context-guarded matching, token indexing, filtering and scoring
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Search core
//!
//! The only part of the system with non-trivial algorithmic content. Each
//! search request is a pure, side-effect-free pipeline over the current
//! token-index snapshot: term lists are normalized and expanded, compiled
//! into admissibility predicates, evaluated against the ingredient-line
//! store, then scored and ranked.

/// Ranked search over the corpus (filter, score, sort, paginate)
pub mod engine;

/// Morphological variant expansion for user-supplied terms
pub mod expand;

/// Context guard suppressing matches followed by disqualifying phrases
pub mod guard;

/// Per-recipe token index build and refresh
pub mod index;

/// Storage-agnostic admissibility predicates
pub mod predicate;

/// Ingredient-line tokenization and blob splitting
pub mod tokenize;

/// Forgivable staples, descriptive modifiers and the allowed vocabulary
pub mod vocab;
