//! foglio — a content repository for slug-addressed documents.
//!
//! Two storage media implement one contract: a directory of front-matter
//! documents (scanned into an index, with per-slug loads memoized under a
//! TTL) and a relational store (filtered in SQL, relations resolved in
//! bulk). Callers look up by slug or by an optional-keys filter bag and get
//! back records or typed absence; rendering and transport live elsewhere.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;

pub use application::repos::{ContentRepo, PostFilter, Prefetch, RepoError};
pub use config::{BackendSettings, ContentConfig};
pub use domain::entities::{Author, Category, Post};

use cache::SystemClock;
use infra::content::FileContentRepo;
use infra::db::SqliteRepositories;

/// Build the repository selected by `config.backend`.
///
/// The file backend scans its directory up front; the database backend
/// connects a pool and applies pending migrations.
pub async fn connect_repository(config: &ContentConfig) -> Result<Arc<dyn ContentRepo>, RepoError> {
    match &config.backend {
        BackendSettings::Files {
            dir,
            cache_ttl_seconds,
        } => {
            debug!(dir = %dir.display(), ttl_seconds = *cache_ttl_seconds, "Using file backend");
            let repo = FileContentRepo::open(
                dir,
                Duration::from_secs(*cache_ttl_seconds),
                Arc::new(SystemClock),
            )
            .await?;
            Ok(Arc::new(repo))
        }
        BackendSettings::Database {
            url,
            max_connections,
        } => {
            debug!(max_connections = *max_connections, "Using database backend");
            let pool = SqliteRepositories::connect(url, *max_connections)
                .await
                .map_err(RepoError::from_persistence)?;
            SqliteRepositories::run_migrations(&pool)
                .await
                .map_err(RepoError::from_persistence)?;
            Ok(Arc::new(SqliteRepositories::new(pool)))
        }
    }
}
