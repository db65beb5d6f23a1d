// ABOUTME: Main library entry point for the Pantry Recipe API
// ABOUTME: Provides ingredient-matching recipe search over a variable-shaped SQLite corpus
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![deny(unsafe_code)]

//! # Pantry Recipe API
//!
//! A recipe search service that answers: given ingredients a user has
//! (required), ingredients they would like to use (optional), and ingredients
//! to avoid (excluded), which recipes fit best, and how well?
//!
//! ## Architecture
//!
//! The service is a thin HTTP layer over a deterministic matching core:
//! - **Corpus**: one-time schema discovery over a variable-shaped `SQLite`
//!   recipe store, producing a fixed logical-field mapping
//! - **Search**: term expansion, context-guarded line matching, a precomputed
//!   per-recipe token index, and the scoring/ranking pipeline
//! - **Routes**: `/search`, `/recipe/:id` and `/health` endpoints
//!
//! The token index is built once at startup, before any request is served.
//! Every search request is a pure read over that immutable snapshot, so
//! requests run concurrently with no locking beyond `SQLite` WAL reads.

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the server binary (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access them.

/// Environment-driven server configuration
pub mod config;

/// Schema discovery and read access for the external recipe corpus
pub mod corpus;

/// Unified error handling system
pub mod errors;

/// Production logging configuration
pub mod logging;

/// Wire types for requests and responses
pub mod models;

/// `HTTP` routes for search, recipe detail and health endpoints
pub mod routes;

/// The ingredient-matching and ranking engine
pub mod search;
