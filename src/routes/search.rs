// ABOUTME: Route handler for the ranked ingredient search endpoint
// ABOUTME: Accepts three term lists plus pagination/sort and returns ordered result rows
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Search route
//!
//! `POST /search` with a [`SearchRequest`] body. A storage fault during
//! evaluation surfaces as one search-failed error; no partial result list is
//! ever returned.

use super::AppState;
use crate::errors::AppError;
use crate::models::{SearchRequest, SearchRow};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::error;

/// Search routes implementation
pub struct SearchRoutes;

impl SearchRoutes {
    /// Create the search route
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/search", post(Self::handle_search))
            .with_state(state)
    }

    /// Handle POST /search
    async fn handle_search(
        State(state): State<Arc<AppState>>,
        Json(request): Json<SearchRequest>,
    ) -> Result<Json<Vec<SearchRow>>, AppError> {
        let rows = state.engine.search(&request).await.map_err(|e| {
            error!("Search evaluation failed: {e}");
            e
        })?;
        Ok(Json(rows))
    }
}
