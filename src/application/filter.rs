//! In-memory predicate composition for the optional-keys filter bag.
//!
//! Each filter key has its own builder that either declines (no constraint)
//! or produces one predicate; [`compose`] is the conjunction of whatever the
//! builders returned. Builders never look at each other's keys, so the
//! result set is the same in whatever order they run.

use crate::application::repos::PostFilter;
use crate::domain::entities::Post;

pub type PostPredicate = Box<dyn Fn(&Post) -> bool + Send + Sync>;

type ConstraintBuilder = fn(&PostFilter) -> Option<PostPredicate>;

const BUILDERS: &[ConstraintBuilder] = &[
    search_constraint,
    category_constraint,
    author_constraint,
];

/// Build the conjunctive predicate for `filter`.
///
/// An empty filter bag composes to the identity predicate.
pub fn compose(filter: &PostFilter) -> PostPredicate {
    let constraints: Vec<PostPredicate> =
        BUILDERS.iter().filter_map(|build| build(filter)).collect();
    Box::new(move |post| constraints.iter().all(|matches| matches(post)))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn search_constraint(filter: &PostFilter) -> Option<PostPredicate> {
    let needle = present(&filter.search)?.to_lowercase();
    Some(Box::new(move |post| {
        post.title.to_lowercase().contains(&needle)
            || post.body.to_lowercase().contains(&needle)
    }))
}

fn category_constraint(filter: &PostFilter) -> Option<PostPredicate> {
    let slug = present(&filter.category)?.to_string();
    Some(Box::new(move |post| {
        post.category
            .as_ref()
            .is_some_and(|category| category.slug == slug)
    }))
}

fn author_constraint(filter: &PostFilter) -> Option<PostPredicate> {
    let username = present(&filter.author)?.to_string();
    Some(Box::new(move |post| {
        post.author
            .as_ref()
            .is_some_and(|author| author.username == username)
    }))
}

#[cfg(test)]
mod tests {
    use crate::domain::entities::{Author, Category};

    use super::*;

    fn sample_post(slug: &str, category: &str, author: &str, body: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: format!("The {slug} post"),
            excerpt: None,
            body: body.to_string(),
            published_at: None,
            category: Some(Category {
                slug: category.to_string(),
                name: category.to_string(),
            }),
            author: Some(Author {
                username: author.to_string(),
                name: author.to_string(),
            }),
        }
    }

    fn fixture() -> Vec<Post> {
        vec![
            sample_post("my-first-post", "family", "jane", "Lorem ipsum dolor"),
            sample_post("my-second-post", "work", "jane", "Lorem ipsum dolor"),
            sample_post("my-third-post", "work", "omar", "Something else entirely"),
        ]
    }

    fn matching_slugs(filter: &PostFilter) -> Vec<String> {
        let predicate = compose(filter);
        fixture()
            .into_iter()
            .filter(|post| predicate(post))
            .map(|post| post.slug)
            .collect()
    }

    #[test]
    fn empty_filter_is_identity() {
        let slugs = matching_slugs(&PostFilter::default());
        assert_eq!(slugs, ["my-first-post", "my-second-post", "my-third-post"]);
    }

    #[test]
    fn empty_strings_place_no_constraint() {
        let filter = PostFilter {
            search: Some(String::new()),
            category: Some(String::new()),
            author: Some(String::new()),
        };
        assert_eq!(matching_slugs(&filter).len(), 3);
    }

    #[test]
    fn search_matches_title_or_body_case_insensitively() {
        let by_body = PostFilter {
            search: Some("LOREM".to_string()),
            ..PostFilter::default()
        };
        assert_eq!(matching_slugs(&by_body), ["my-first-post", "my-second-post"]);

        let by_title = PostFilter {
            search: Some("third".to_string()),
            ..PostFilter::default()
        };
        assert_eq!(matching_slugs(&by_title), ["my-third-post"]);
    }

    #[test]
    fn category_matches_related_slug_exactly() {
        let filter = PostFilter {
            category: Some("work".to_string()),
            ..PostFilter::default()
        };
        assert_eq!(matching_slugs(&filter), ["my-second-post", "my-third-post"]);
    }

    #[test]
    fn author_matches_related_username_exactly() {
        let filter = PostFilter {
            author: Some("omar".to_string()),
            ..PostFilter::default()
        };
        assert_eq!(matching_slugs(&filter), ["my-third-post"]);
    }

    #[test]
    fn present_keys_combine_conjunctively() {
        let filter = PostFilter {
            search: Some("lorem".to_string()),
            category: Some("family".to_string()),
            author: None,
        };
        assert_eq!(matching_slugs(&filter), ["my-first-post"]);
    }

    #[test]
    fn unmatched_category_yields_empty_set() {
        let filter = PostFilter {
            category: Some("nonexistent".to_string()),
            ..PostFilter::default()
        };
        assert!(matching_slugs(&filter).is_empty());
    }

    #[test]
    fn conjunction_is_order_independent() {
        let filter = PostFilter {
            search: Some("lorem".to_string()),
            category: Some("work".to_string()),
            author: Some("jane".to_string()),
        };

        let mut orders: Vec<Vec<usize>> = vec![
            vec![0, 1, 2],
            vec![2, 1, 0],
            vec![1, 0, 2],
            vec![2, 0, 1],
        ];
        let mut results = Vec::new();
        for order in orders.drain(..) {
            let constraints: Vec<PostPredicate> = order
                .into_iter()
                .filter_map(|index| BUILDERS[index](&filter))
                .collect();
            let slugs: Vec<String> = fixture()
                .into_iter()
                .filter(|post| constraints.iter().all(|matches| matches(post)))
                .map(|post| post.slug)
                .collect();
            results.push(slugs);
        }

        for slugs in &results {
            assert_eq!(slugs, &results[0]);
        }
        assert_eq!(results[0], ["my-second-post"]);
    }

    #[test]
    fn relationless_posts_never_match_relation_filters() {
        let bare = Post {
            slug: "bare".to_string(),
            title: "Bare".to_string(),
            excerpt: None,
            body: String::new(),
            published_at: None,
            category: None,
            author: None,
        };
        let filter = PostFilter {
            category: Some("work".to_string()),
            ..PostFilter::default()
        };
        let predicate = compose(&filter);
        assert!(!predicate(&bare));
    }
}
