// ABOUTME: Route handler for single-recipe detail lookup
// ABOUTME: Distinguishes bad-id (400) from absent-id (404) and synthesizes blank names
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recipe detail route
//!
//! `GET /recipe/:id`. The id segment is extracted as a raw string so that a
//! non-numeric id maps to our bad-request error rather than axum's default
//! rejection; the two failure conditions stay distinct (400 vs 404).

use super::AppState;
use crate::errors::AppError;
use crate::models::RecipeDetail;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create the recipe detail route
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/recipe/:id", get(Self::handle_detail))
            .with_state(state)
    }

    /// Handle GET /recipe/:id
    async fn handle_detail(
        State(state): State<Arc<AppState>>,
        Path(raw_id): Path<String>,
    ) -> Result<Json<RecipeDetail>, AppError> {
        let id: i64 = raw_id
            .parse()
            .map_err(|_| AppError::invalid_input(format!("Invalid recipe id '{raw_id}'")))?;

        let detail = state
            .store
            .fetch_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        Ok(Json(detail))
    }
}
