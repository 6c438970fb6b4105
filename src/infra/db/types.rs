use time::Date;

use crate::domain::entities::{Author, Category, Post};

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) excerpt: Option<String>,
    pub(crate) body: String,
    pub(crate) published_at: Option<Date>,
    pub(crate) category_id: i64,
    pub(crate) author_id: i64,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            body: row.body,
            published_at: row.published_at,
            category: None,
            author: None,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CategoryRow {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            slug: row.slug,
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AuthorRow {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) name: String,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            username: row.username,
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct JoinedPostRow {
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) excerpt: Option<String>,
    pub(crate) body: String,
    pub(crate) published_at: Option<Date>,
    pub(crate) category_slug: String,
    pub(crate) category_name: String,
    pub(crate) author_username: String,
    pub(crate) author_name: String,
}

impl From<JoinedPostRow> for Post {
    fn from(row: JoinedPostRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            body: row.body,
            published_at: row.published_at,
            category: Some(Category {
                slug: row.category_slug,
                name: row.category_name,
            }),
            author: Some(Author {
                username: row.author_username,
                name: row.author_name,
            }),
        }
    }
}
