//! Repository contract shared by the storage backends.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Post;
use crate::domain::frontmatter::ParseError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Optional-key filter bag for collection lookups.
///
/// Every key is independently optional; `None` or an empty string places no
/// constraint. Present keys are combined conjunctively, and the match is
/// case-insensitive for `search` only.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Substring match against title or body.
    pub search: Option<String>,
    /// Exact match against the related category's slug.
    pub category: Option<String>,
    /// Exact match against the related author's username.
    pub author: Option<String>,
}

/// Caller-requested relation resolution for collection fetches.
///
/// Requested relations are loaded in bulk: the backing store sees one posts
/// query plus at most one query per requested relation, independent of the
/// number of rows returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prefetch {
    pub category: bool,
    pub author: bool,
}

impl Prefetch {
    pub const NONE: Self = Self {
        category: false,
        author: false,
    };
    pub const ALL: Self = Self {
        category: true,
        author: true,
    };
}

/// Lookup-by-key and lookup-by-filter over a post collection.
///
/// Absence is an ordinary value: `find_by_slug` returns `Ok(None)` for an
/// unknown slug and `list_posts` returns an empty vector for no matches.
/// I/O and driver faults propagate as [`RepoError`] without internal
/// retries.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn list_posts(
        &self,
        filter: &PostFilter,
        prefetch: Prefetch,
    ) -> Result<Vec<Post>, RepoError>;
}
