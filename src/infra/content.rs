//! File-backed post storage: directory scan, slug index, cached loads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, warn};

use crate::application::filter::compose;
use crate::application::repos::{ContentRepo, PostFilter, Prefetch, RepoError};
use crate::cache::{Clock, TtlCache};
use crate::domain::entities::Post;
use crate::domain::frontmatter::{self, ParseError};

/// Why a document was left out of the index. The failing file never aborts
/// the build for its siblings.
#[derive(Debug)]
pub enum IndexDiagnostic {
    Parse { path: PathBuf, error: ParseError },
    DuplicateSlug { path: PathBuf, slug: String },
    Unreadable { path: PathBuf, error: std::io::Error },
}

impl IndexDiagnostic {
    pub fn path(&self) -> &Path {
        match self {
            Self::Parse { path, .. }
            | Self::DuplicateSlug { path, .. }
            | Self::Unreadable { path, .. } => path,
        }
    }
}

/// Ordered collection of parsed documents with a slug index.
///
/// Built once from a source directory; lookups by slug are direct map hits,
/// never scans. Entries are visited in file-name order so the scan order is
/// stable across builds.
pub struct ContentIndex {
    posts: Vec<Post>,
    by_slug: HashMap<String, usize>,
    paths: HashMap<String, PathBuf>,
    diagnostics: Vec<IndexDiagnostic>,
}

impl ContentIndex {
    pub async fn build(dir: &Path) -> Result<Self, RepoError> {
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            if entry.file_type().await?.is_file() {
                entries.push(entry.path());
            }
        }
        entries.sort();

        let mut index = Self {
            posts: Vec::with_capacity(entries.len()),
            by_slug: HashMap::new(),
            paths: HashMap::new(),
            diagnostics: Vec::new(),
        };

        for path in entries {
            match tokio::fs::read_to_string(&path).await {
                Ok(raw) => match frontmatter::parse(&raw) {
                    Ok(post) => index.insert(path, post),
                    Err(error) => index.skip(IndexDiagnostic::Parse { path, error }),
                },
                Err(error) => index.skip(IndexDiagnostic::Unreadable { path, error }),
            }
        }

        debug!(
            documents = index.posts.len(),
            skipped = index.diagnostics.len(),
            dir = %dir.display(),
            "Content index built"
        );
        Ok(index)
    }

    fn insert(&mut self, path: PathBuf, post: Post) {
        if self.by_slug.contains_key(&post.slug) {
            let slug = post.slug;
            self.skip(IndexDiagnostic::DuplicateSlug { path, slug });
            return;
        }
        self.by_slug.insert(post.slug.clone(), self.posts.len());
        self.paths.insert(post.slug.clone(), path);
        self.posts.push(post);
    }

    fn skip(&mut self, diagnostic: IndexDiagnostic) {
        warn!(path = %diagnostic.path().display(), detail = ?diagnostic, "Skipping document");
        counter!("foglio_index_skipped_total").increment(1);
        self.diagnostics.push(diagnostic);
    }

    /// All indexed documents in scan order.
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.by_slug.get(slug).map(|&at| &self.posts[at])
    }

    pub fn path_for(&self, slug: &str) -> Option<&Path> {
        self.paths.get(slug).map(PathBuf::as_path)
    }

    /// Documents excluded from the index, with the reason and file path.
    pub fn diagnostics(&self) -> &[IndexDiagnostic] {
        &self.diagnostics
    }
}

/// [`ContentRepo`] over a directory of front-matter documents.
///
/// Collection reads come from the build-time snapshot; per-slug lookups
/// re-load the document from disk through the TTL cache, so an edited file
/// is picked up once its cache window lapses.
pub struct FileContentRepo {
    index: ContentIndex,
    cache: TtlCache<Post>,
    ttl: Duration,
}

impl FileContentRepo {
    pub async fn open(dir: &Path, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self, RepoError> {
        let index = ContentIndex::build(dir).await?;
        Ok(Self {
            index,
            cache: TtlCache::new(clock),
            ttl,
        })
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }
}

#[async_trait]
impl ContentRepo for FileContentRepo {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let Some(path) = self.index.path_for(slug) else {
            return Ok(None);
        };
        let path = path.to_path_buf();

        let post = self
            .cache
            .get_or_try_compute(slug, self.ttl, || async move {
                let raw = tokio::fs::read_to_string(&path).await?;
                Ok::<_, RepoError>(frontmatter::parse(&raw)?)
            })
            .await?;
        Ok(Some(post))
    }

    // Relations live inline in the front matter, so prefetch costs nothing
    // here regardless of what the caller requested.
    async fn list_posts(
        &self,
        filter: &PostFilter,
        _prefetch: Prefetch,
    ) -> Result<Vec<Post>, RepoError> {
        let predicate = compose(filter);
        Ok(self
            .index
            .all()
            .iter()
            .filter(|post| predicate(post))
            .cloned()
            .collect())
    }
}
