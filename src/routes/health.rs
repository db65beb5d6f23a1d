// ABOUTME: Health check route reporting corpus size and optional capabilities
// ABOUTME: Clients use the capability flags to decide which sort modes to offer
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Health check route

use super::AppState;
use crate::errors::AppError;
use crate::models::HealthResponse;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(state)
    }

    /// Handle GET /health
    async fn handle_health(
        State(state): State<Arc<AppState>>,
    ) -> Result<Json<HealthResponse>, AppError> {
        let recipes = state.store.recipe_count().await?;
        let schema = state.store.schema();
        Ok(Json(HealthResponse {
            ok: true,
            recipes,
            has_minutes: schema.has_minutes(),
            has_ingredient_lines: schema.has_ingredient_lines(),
        }))
    }
}
