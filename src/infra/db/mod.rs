//! SQLite-backed repository implementation.

mod posts;
mod types;
mod util;

pub use util::map_sqlx_error;

use metrics::counter;
use sqlx::{
    QueryBuilder, Sqlite,
    sqlite::{SqlitePool, SqlitePoolOptions},
};

use crate::application::repos::PostFilter;

#[derive(Clone)]
pub struct SqliteRepositories {
    pool: SqlitePool,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    /// One condition per present filter key, ANDed onto the posts query.
    /// Each key is evaluated independently, so the order of application
    /// cannot change the result set.
    fn apply_post_filter<'q>(qb: &mut QueryBuilder<'q, Sqlite>, filter: &'q PostFilter) {
        if let Some(search) = present(&filter.search) {
            // SQLite's LOWER() folds ASCII only, so matching here is
            // ASCII-case-insensitive.
            let pattern = format!("%{}%", search.to_lowercase());
            qb.push(" AND (LOWER(p.title) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(p.body) LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(category) = present(&filter.category) {
            qb.push(
                " AND EXISTS (SELECT 1 FROM categories c WHERE c.id = p.category_id AND c.slug = ",
            );
            qb.push_bind(category);
            qb.push(")");
        }

        if let Some(author) = present(&filter.author) {
            qb.push(
                " AND EXISTS (SELECT 1 FROM authors a WHERE a.id = p.author_id AND a.username = ",
            );
            qb.push_bind(author);
            qb.push(")");
        }
    }

    fn record_round_trip(operation: &'static str) {
        counter!("foglio_db_query_total", "operation" => operation).increment(1);
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
