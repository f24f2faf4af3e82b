//! Data access
//!
//! [`DataStore`] has one method per endpoint query. [`PgStore`] runs them
//! against PostgreSQL through a shared `sqlx` pool; sqlx prepares each
//! statement once per connection and reuses it for later calls.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::models::{Christenings, ChristeningsByYear, Parish, VerseQuotation};
use crate::trend::{Corpus, YearRate};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read-only queries behind the HTTP endpoints
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Chronicling America quotations of `reference`, ordered by date
    async fn verse_quotations(&self, reference: &str) -> StoreResult<Vec<VerseQuotation>>;

    /// Precomputed yearly rates of `reference` in `corpus`, limited to the corpus window
    async fn verse_rates(&self, corpus: Corpus, reference: &str) -> StoreResult<Vec<YearRate>>;

    /// Christenings with `start_year <= year < end_year`, ordered by count
    async fn christenings(
        &self,
        start_year: i64,
        end_year: i64,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<ChristeningsByYear>>;

    /// Distinct christening descriptions in ascending order
    async fn christening_labels(&self) -> StoreResult<Vec<Christenings>>;

    /// All parishes ordered by canonical name
    async fn parishes(&self) -> StoreResult<Vec<Parish>>;

    /// Round-trip check used by the health probe
    async fn ping(&self) -> StoreResult<()>;
}

const VERSE_QUOTATIONS_SQL: &str = r#"
SELECT q.reference_id AS reference,
       q.version,
       q.doc_id,
       q.date::text AS date,
       q.probability::real AS probability,
       n.title_clean AS title
FROM apb.quotations q
LEFT JOIN chronam.pages p ON q.doc_id = p.doc_id
LEFT JOIN chronam.newspapers n ON p.lccn = n.lccn
WHERE q.reference_id = $1 AND q.corpus = 'chronam'
ORDER BY q.date
"#;

const VERSE_RATES_SQL: &str = r#"
SELECT year::int AS year,
       COALESCE(n, 0)::int AS n,
       COALESCE(q_per_word_e6, 0)::float8 AS rate
FROM apb.rate_quotations_verses
WHERE corpus = $1 AND reference_id = $2 AND year BETWEEN $3 AND $4
ORDER BY year
"#;

const CHRISTENINGS_SQL: &str = r#"
SELECT c.christening_desc AS christenings_desc,
       c.count::bigint AS count,
       w.week_no::int AS week_no,
       c.week_id::text AS week_id,
       y.year::int AS year
FROM bom.christenings c
JOIN bom.year y ON y.year_id = c.year_id
JOIN bom.week w ON w.week_id = c.week_id
WHERE y.year >= $1 AND y.year < $2
ORDER BY c.count, y.year, w.week_no, c.christening_desc
LIMIT $3
OFFSET $4
"#;

const CHRISTENING_LABELS_SQL: &str = r#"
SELECT DISTINCT christening_desc AS name
FROM bom.christenings
ORDER BY christening_desc ASC
"#;

const PARISHES_SQL: &str = r#"
SELECT id::int AS id, parish_name AS name, canonical_name
FROM bom.parishes
ORDER BY canonical_name
"#;

/// PostgreSQL-backed store
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a pool and verify it with one round-trip
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "connecting to the database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(config.connect_options())
            .await?;

        let store = Self { pool };
        store.ping().await?;
        Ok(store)
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        info!("closing the connection to the database");
        self.pool.close().await;
    }
}

#[async_trait]
impl DataStore for PgStore {
    #[instrument(skip(self))]
    async fn verse_quotations(&self, reference: &str) -> StoreResult<Vec<VerseQuotation>> {
        let rows = sqlx::query_as::<_, VerseQuotation>(VERSE_QUOTATIONS_SQL)
            .bind(reference)
            .fetch_all(&self.pool)
            .await?;
        debug!(rows = rows.len(), "verse quotations fetched");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn verse_rates(&self, corpus: Corpus, reference: &str) -> StoreResult<Vec<YearRate>> {
        let rows = sqlx::query_as::<_, YearRate>(VERSE_RATES_SQL)
            .bind(corpus.as_str())
            .bind(reference)
            .bind(corpus.min_year())
            .bind(corpus.max_year())
            .fetch_all(&self.pool)
            .await?;
        debug!(rows = rows.len(), "verse rates fetched");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn christenings(
        &self,
        start_year: i64,
        end_year: i64,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<ChristeningsByYear>> {
        let rows = sqlx::query_as::<_, ChristeningsByYear>(CHRISTENINGS_SQL)
            .bind(start_year)
            .bind(end_year)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        debug!(rows = rows.len(), "christenings fetched");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn christening_labels(&self) -> StoreResult<Vec<Christenings>> {
        Ok(sqlx::query_as::<_, Christenings>(CHRISTENING_LABELS_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    #[instrument(skip(self))]
    async fn parishes(&self) -> StoreResult<Vec<Parish>> {
        Ok(sqlx::query_as::<_, Parish>(PARISHES_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_are_parameterized() {
        assert!(VERSE_QUOTATIONS_SQL.contains("$1"));
        assert!(VERSE_RATES_SQL.contains("$4"));
        assert!(CHRISTENINGS_SQL.contains("LIMIT $3"));
        assert!(CHRISTENINGS_SQL.contains("OFFSET $4"));
    }

    #[test]
    fn test_christenings_order_is_total() {
        assert!(CHRISTENINGS_SQL.contains("ORDER BY c.count, y.year, w.week_no, c.christening_desc"));
    }

    #[test]
    fn test_christenings_year_range_is_half_open() {
        assert!(CHRISTENINGS_SQL.contains("y.year >= $1"));
        assert!(CHRISTENINGS_SQL.contains("y.year < $2"));
    }

    #[test]
    fn test_column_aliases_match_records() {
        for alias in ["AS reference", "AS date", "AS probability", "AS title"] {
            assert!(VERSE_QUOTATIONS_SQL.contains(alias), "missing {alias}");
        }
        assert!(PARISHES_SQL.contains("AS name"));
        assert!(CHRISTENING_LABELS_SQL.contains("AS name"));
    }
}
