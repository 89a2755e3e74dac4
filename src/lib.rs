//! Bookshelf Personal Book Catalog Server
//!
//! A Rust server managing a shared book catalog keyed by ISBN, per-user
//! bookshelf collections, and role-based user accounts. Book records for
//! unknown ISBNs are acquired automatically from the National Library of
//! China OPAC (see the [`opac`] module).

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod opac;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
