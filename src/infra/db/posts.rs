use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::QueryBuilder;

use crate::application::repos::{ContentRepo, PostFilter, Prefetch, RepoError};
use crate::domain::entities::{Author, Category, Post};

use super::SqliteRepositories;
use super::types::{AuthorRow, CategoryRow, JoinedPostRow, PostRow};
use super::util::map_sqlx_error;

impl SqliteRepositories {
    async fn load_categories(&self, ids: &[i64]) -> Result<HashMap<i64, Category>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT id, slug, name FROM categories WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        qb.push(")");

        let rows: Vec<CategoryRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::record_round_trip("categories_bulk");

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                (id, Category::from(row))
            })
            .collect())
    }

    async fn load_authors(&self, ids: &[i64]) -> Result<HashMap<i64, Author>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT id, username, name FROM authors WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        qb.push(")");

        let rows: Vec<AuthorRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::record_round_trip("authors_bulk");

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                (id, Author::from(row))
            })
            .collect())
    }
}

#[async_trait]
impl ContentRepo for SqliteRepositories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let row: Option<JoinedPostRow> = sqlx::query_as(
            "SELECT p.slug, p.title, p.excerpt, p.body, p.published_at, \
             c.slug AS category_slug, c.name AS category_name, \
             a.username AS author_username, a.name AS author_name \
             FROM posts p \
             INNER JOIN categories c ON c.id = p.category_id \
             INNER JOIN authors a ON a.id = p.author_id \
             WHERE p.slug = ?",
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Self::record_round_trip("post_by_slug");

        Ok(row.map(Post::from))
    }

    /// One posts query plus at most one bulk query per requested relation,
    /// whatever the result-set size.
    async fn list_posts(
        &self,
        filter: &PostFilter,
        prefetch: Prefetch,
    ) -> Result<Vec<Post>, RepoError> {
        let mut qb = QueryBuilder::new(
            "SELECT p.slug, p.title, p.excerpt, p.body, p.published_at, \
             p.category_id, p.author_id FROM posts p WHERE 1=1 ",
        );
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" ORDER BY p.published_at IS NULL, p.published_at DESC, p.id DESC");

        let rows: Vec<PostRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::record_round_trip("posts_list");

        let categories = if prefetch.category && !rows.is_empty() {
            let mut ids: Vec<i64> = rows.iter().map(|row| row.category_id).collect();
            ids.sort_unstable();
            ids.dedup();
            self.load_categories(&ids).await?
        } else {
            HashMap::new()
        };

        let authors = if prefetch.author && !rows.is_empty() {
            let mut ids: Vec<i64> = rows.iter().map(|row| row.author_id).collect();
            ids.sort_unstable();
            ids.dedup();
            self.load_authors(&ids).await?
        } else {
            HashMap::new()
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let category = categories.get(&row.category_id).cloned();
                let author = authors.get(&row.author_id).cloned();
                let mut post = Post::from(row);
                post.category = category;
                post.author = author;
                post
            })
            .collect())
    }
}
