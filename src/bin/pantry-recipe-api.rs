// ABOUTME: Server binary: config, logging, schema discovery, index build, HTTP serve
// ABOUTME: The token index is built before the listener opens; serving state is immutable
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Pantry Recipe API Server Binary
//!
//! Starts the recipe search service: discovers the corpus schema, builds the
//! token index if absent (refreshing its aggregate otherwise), then serves
//! search, detail and health endpoints.

use anyhow::Result;
use clap::Parser;
use pantry_recipe_api::{
    config::ServerConfig,
    corpus::{self, CorpusSchema, RecipeStore},
    logging,
    routes::{self, AppState},
    search::engine::SearchEngine,
    search::index::{RebuildOutcome, TokenIndex},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "pantry-recipe-api")]
#[command(about = "Pantry Recipe API - ingredient-matching recipe search")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override corpus database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle container environments where clap may not work properly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using environment configuration");
            Args {
                http_port: None,
                database_url: None,
            }
        }
    };

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting Pantry Recipe API");
    info!("{}", config.summary());

    let pool = corpus::connect(&config.database_url).await?;

    // Startup-fatal when the corpus has no identifiable recipe id.
    let schema = Arc::new(CorpusSchema::discover(&pool).await?);
    let store = RecipeStore::new(pool.clone(), schema.clone());

    // Two-phase lifecycle: the index is written here, once, and is read-only
    // for the life of the listener.
    let index = TokenIndex::new(pool.clone());
    match index.rebuild(&store).await? {
        RebuildOutcome::Refreshed => info!("Token index ready (aggregate refreshed)"),
        RebuildOutcome::Built { recipes, tokens } => {
            info!(recipes, tokens, "Token index built");
        }
    }

    let engine = SearchEngine::new(pool, schema);
    let state = Arc::new(AppState::new(store, engine));
    let app = routes::router(state);

    let addr = format!("{}:{}", config.http_host, config.http_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Pantry Recipe API stopped");

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received, draining connections");
}
