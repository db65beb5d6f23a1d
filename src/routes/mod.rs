// ABOUTME: HTTP route assembly and shared application state
// ABOUTME: Wires health, search and recipe routers over Arc<AppState> with trace and CORS layers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTTP routes
//!
//! Three endpoints: `POST /search`, `GET /recipe/:id` and `GET /health`.
//! Handlers are pure readers over [`AppState`]; all mutation of derived state
//! happened at startup, before the router existed.

/// Health and capability reporting
pub mod health;

/// Recipe detail lookup
pub mod recipes;

/// Ranked ingredient search
pub mod search;

use crate::corpus::RecipeStore;
use crate::search::engine::SearchEngine;
use axum::Router;
use http::header::CONTENT_TYPE;
use http::Method;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for all route handlers
#[derive(Clone)]
pub struct AppState {
    /// Read access to the corpus
    pub store: RecipeStore,
    /// The search pipeline
    pub engine: SearchEngine,
}

impl AppState {
    /// Bundle the store and engine for the router
    #[must_use]
    pub const fn new(store: RecipeStore, engine: SearchEngine) -> Self {
        Self { store, engine }
    }
}

/// Build the full application router
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes(state.clone()))
        .merge(search::SearchRoutes::routes(state.clone()))
        .merge(recipes::RecipeRoutes::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors())
}

/// Permissive CORS: the browser client is served from a different origin and
/// the API carries no credentials.
fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}
