use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use foglio::application::repos::{ContentRepo, PostFilter, Prefetch};
use foglio::cache::ManualClock;
use foglio::infra::content::FileContentRepo;
use foglio::infra::db::SqliteRepositories;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

fn db_query_total(snapshotter: &Snapshotter) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(composite_key, _, _, _)| composite_key.key().name() == "foglio_db_query_total")
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => count,
            _ => 0,
        })
        .sum()
}

async fn seed_posts(repos: &SqliteRepositories, from: usize, to: usize) {
    for n in from..to {
        sqlx::query(
            "INSERT INTO posts (slug, title, excerpt, body, published_at, category_id, author_id) \
             VALUES (?, ?, NULL, ?, NULL, 1, 1)",
        )
        .bind(format!("post-{n}"))
        .bind(format!("Post {n}"))
        .bind("Lorem ipsum dolor")
        .execute(repos.pool())
        .await
        .expect("post should insert");
    }
}

#[tokio::test]
async fn round_trips_stay_constant_and_metric_keys_are_emitted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let pool = SqliteRepositories::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory pool should connect");
    SqliteRepositories::run_migrations(&pool)
        .await
        .expect("migrations should apply");
    let repos = SqliteRepositories::new(pool);

    sqlx::query("INSERT INTO categories (slug, name) VALUES ('work', 'Work')")
        .execute(repos.pool())
        .await
        .expect("category should insert");
    sqlx::query("INSERT INTO authors (username, name) VALUES ('jane', 'Jane Doe')")
        .execute(repos.pool())
        .await
        .expect("author should insert");

    // Relation prefetch must load in bulk: the round-trip count for a
    // listing is the same at N=5 and N=50.
    seed_posts(&repos, 0, 5).await;
    let before_small = db_query_total(&snapshotter);
    let small = repos
        .list_posts(&PostFilter::default(), Prefetch::ALL)
        .await
        .expect("listing should succeed");
    let small_round_trips = db_query_total(&snapshotter) - before_small;
    assert_eq!(small.len(), 5);

    seed_posts(&repos, 5, 50).await;
    let before_large = db_query_total(&snapshotter);
    let large = repos
        .list_posts(&PostFilter::default(), Prefetch::ALL)
        .await
        .expect("listing should succeed");
    let large_round_trips = db_query_total(&snapshotter) - before_large;
    assert_eq!(large.len(), 50);

    assert_eq!(
        small_round_trips, large_round_trips,
        "round trips must not scale with result-set size"
    );
    assert_eq!(large_round_trips, 3, "posts query plus one per relation");

    // A listing without prefetch is a single round trip.
    let before_bare = db_query_total(&snapshotter);
    repos
        .list_posts(&PostFilter::default(), Prefetch::NONE)
        .await
        .expect("listing should succeed");
    assert_eq!(db_query_total(&snapshotter) - before_bare, 1);

    // Drive the file path once so cache and index counters fire too.
    let dir = tempfile::tempdir().expect("temp content dir should be created");
    std::fs::write(
        dir.path().join("good.md"),
        "title: Good\nslug: good\n---\nbody\n",
    )
    .expect("fixture doc should be written");
    std::fs::write(dir.path().join("bad.md"), "title: Slugless\n---\nbody\n")
        .expect("fixture doc should be written");

    let file_repo = FileContentRepo::open(
        dir.path(),
        Duration::from_secs(1200),
        Arc::new(ManualClock::new()),
    )
    .await
    .expect("repo should open");
    for _ in 0..2 {
        file_repo
            .find_by_slug("good")
            .await
            .expect("lookup should succeed")
            .expect("post should exist");
    }

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "foglio_db_query_total",
        "foglio_cache_hit_total",
        "foglio_cache_miss_total",
        "foglio_index_skipped_total",
    ];
    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
