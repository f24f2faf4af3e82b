//! PostgreSQL store tests
//!
//! These run the real queries and only execute when `RELECAPI_TEST_DB=1`.
//! Connection settings come from the usual `RELECAPI_*` variables, and the
//! database must hold the `apb` and `bom` schemas.
//!
//! ```text
//! RELECAPI_TEST_DB=1 RELECAPI_DBNAME=dataapi cargo test --test pg_store_tests
//! ```

use relec_api::{config::Config, Corpus, DataStore, PgStore};

const TEST_DB_ENV: &str = "RELECAPI_TEST_DB";
const TEST_REF_ENV: &str = "RELECAPI_TEST_REF";

async fn connect() -> Option<PgStore> {
    if std::env::var(TEST_DB_ENV).ok().as_deref() != Some("1") {
        eprintln!("skipping: set {TEST_DB_ENV}=1 to run against PostgreSQL");
        return None;
    }
    let config = Config::from_env().expect("valid RELECAPI_* configuration");
    Some(
        PgStore::connect(&config.database)
            .await
            .expect("database reachable"),
    )
}

fn test_reference() -> String {
    std::env::var(TEST_REF_ENV).unwrap_or_else(|_| "John 3:16".to_string())
}

// ============================================================================
// APB queries
// ============================================================================

#[tokio::test]
async fn test_quotations_are_date_ordered_chronam_rows() {
    let Some(store) = connect().await else { return };
    let reference = test_reference();

    let rows = store.verse_quotations(&reference).await.unwrap();
    assert!(rows.iter().all(|q| q.reference == reference));
    assert!(rows.windows(2).all(|w| w[0].date <= w[1].date));
    assert!(rows.iter().all(|q| (0.0..=1.0).contains(&q.probability)));

    store.close().await;
}

#[tokio::test]
async fn test_rates_stay_inside_corpus_window() {
    let Some(store) = connect().await else { return };
    let reference = test_reference();

    for corpus in [Corpus::Chronam, Corpus::Ncnp] {
        let rows = store.verse_rates(corpus, &reference).await.unwrap();
        assert!(rows
            .iter()
            .all(|r| r.year >= corpus.min_year() && r.year <= corpus.max_year()));
        assert!(rows.windows(2).all(|w| w[0].year < w[1].year));
        assert!(rows.iter().all(|r| r.n >= 0 && r.rate >= 0.0));
    }

    store.close().await;
}

// ============================================================================
// BOM queries
// ============================================================================

#[tokio::test]
async fn test_christenings_half_open_range_and_count_order() {
    let Some(store) = connect().await else { return };

    let rows = store.christenings(1600, 1700, 500, 0).await.unwrap();
    assert!(rows.iter().all(|c| (1600..1700).contains(&c.year)));
    // NULL counts come last in ascending order
    let keys: Vec<_> = rows.iter().map(|c| (c.count.is_none(), c.count)).collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));

    store.close().await;
}

#[tokio::test]
async fn test_christenings_pages_tile_the_ordering() {
    let Some(store) = connect().await else { return };

    let whole = store.christenings(1600, 1700, 10, 0).await.unwrap();
    let first = store.christenings(1600, 1700, 5, 0).await.unwrap();
    let second = store.christenings(1600, 1700, 5, 5).await.unwrap();

    let paged: Vec<_> = first.iter().chain(second.iter()).collect();
    assert_eq!(paged.len(), whole.len());
    for (a, b) in paged.iter().zip(whole.iter()) {
        assert_eq!(a.week_id, b.week_id);
        assert_eq!(a.christenings_desc, b.christenings_desc);
        assert_eq!(a.count, b.count);
    }

    store.close().await;
}

#[tokio::test]
async fn test_reference_tables_load() {
    let Some(store) = connect().await else { return };

    let labels = store.christening_labels().await.unwrap();
    let mut names: Vec<_> = labels.iter().map(|c| c.name.as_str()).collect();
    let before = names.len();
    names.dedup();
    assert_eq!(names.len(), before, "labels are distinct");

    store.parishes().await.unwrap();
    store.ping().await.unwrap();

    store.close().await;
}
