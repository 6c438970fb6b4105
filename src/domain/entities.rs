//! Domain entities shared by both storage backends.

use serde::Serialize;
use time::Date;

/// A single content document, addressed by its slug.
///
/// Relational rows carry their `category` and `author` only when the caller
/// asked for them to be prefetched; file-backed documents carry whatever the
/// front matter declared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub published_at: Option<Date>,
    pub category: Option<Category>,
    pub author: Option<Author>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub username: String,
    pub name: String,
}
