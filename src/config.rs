// ABOUTME: Environment-driven server configuration with sensible defaults
// ABOUTME: Parses HTTP port, bind host and corpus database URL from the process environment
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Server configuration loaded from environment variables
//!
//! Configuration is environment-only: there is no config file. The server
//! binary may override individual fields from CLI flags after loading.

use crate::errors::{AppError, AppResult};
use std::env;

/// Default HTTP port when `HTTP_PORT` is not set
const DEFAULT_HTTP_PORT: u16 = 5050;

/// Default corpus location when `DATABASE_URL` is not set
const DEFAULT_DATABASE_URL: &str = "sqlite:foodcom.db";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind the HTTP listener to
    pub http_host: String,
    /// Port for the HTTP listener
    pub http_port: u16,
    /// `SQLite` URL of the recipe corpus
    pub database_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns a configuration error if `HTTP_PORT` is set but not a valid port.
    pub fn from_env() -> AppResult<Self> {
        let http_host = env::var("HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid HTTP_PORT '{raw}': {e}")))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());

        Ok(Self {
            http_host,
            http_port,
            database_url,
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http={}:{} corpus={}",
            self.http_host, self.http_port, self.database_url
        )
    }
}
