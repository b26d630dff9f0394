/// Common test harness for database-backed tests
///
/// Each test gets its own scratch database so tests can run in parallel
/// without interfering with each other. The scratch database is created
/// from the server in DATABASE_URL and dropped again on teardown.
///
/// Tests are skipped when DATABASE_URL is not set.

use sqlx::PgPool;
use tasknest_shared::db::migrations::{drop_database, ensure_database_exists, run_migrations};
use tasknest_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use uuid::Uuid;

/// A fresh, fully migrated scratch database
pub struct TestDb {
    pub pool: PgPool,
    url: String,
}

impl TestDb {
    /// Creates a scratch database and applies all migrations
    ///
    /// Returns `None` when DATABASE_URL is not set, so callers can skip.
    pub async fn new() -> Option<TestDb> {
        let base_url = std::env::var("DATABASE_URL").ok()?;
        let url = scratch_url(&base_url);

        ensure_database_exists(&url)
            .await
            .expect("Failed to create scratch database");

        let pool = create_pool(DatabaseConfig {
            url: url.clone(),
            max_connections: 5,
            ..Default::default()
        })
        .await
        .expect("Failed to connect to scratch database");

        run_migrations(&pool).await.expect("Migrations failed");

        Some(TestDb { pool, url })
    }

    /// Closes the pool and drops the scratch database
    pub async fn teardown(self) {
        close_pool(self.pool).await;
        drop_database(&self.url)
            .await
            .expect("Failed to drop scratch database");
    }
}

/// Swaps the database name in a connection URL for a unique scratch name
fn scratch_url(base_url: &str) -> String {
    let (without_query, query) = match base_url.split_once('?') {
        Some((head, tail)) => (head, Some(tail)),
        None => (base_url, None),
    };

    let root = match without_query.rfind('/') {
        Some(idx) => &without_query[..idx],
        None => without_query,
    };

    let name = format!("tasknest_test_{}", Uuid::new_v4().simple());

    match query {
        Some(q) => format!("{}/{}?{}", root, name, q),
        None => format!("{}/{}", root, name),
    }
}
