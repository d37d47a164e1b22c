//! Application state shared across all request handlers.
//!
//! `AppState` is built once during startup and cloned into every handler through
//! Axum's state extraction. It holds:
//! - Database connection pool
//! - Object storage backend for course documents
//! - AI service used for activity generation, analysis and course QA
//! - Settings that handlers need at request time

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::service::{ai::AiService, storage::ObjectStorage};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `Arc<dyn ObjectStorage>` and `AiService` are reference counted
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// Object storage holding uploaded course documents.
    pub storage: Arc<dyn ObjectStorage>,

    /// Chat completion backed AI features.
    pub ai: AiService,

    /// Required suffix for user email addresses, e.g. `@connect.polyu.hk`.
    pub email_domain: String,

    /// Password assigned to accounts created by bulk imports.
    pub default_import_password: String,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `storage` - Object storage backend for documents
    /// - `ai` - AI service
    /// - `email_domain` - Required email suffix
    /// - `default_import_password` - Password for imported accounts
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn ObjectStorage>,
        ai: AiService,
        email_domain: String,
        default_import_password: String,
    ) -> Self {
        Self {
            db,
            storage,
            ai,
            email_domain,
            default_import_password,
        }
    }
}
