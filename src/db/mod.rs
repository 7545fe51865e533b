//! This module is responsible for reading, writing and managing the SQLite ledger database.
//!
//! The database holds two tables: `transactions` (append-only dated, categorized amounts) and
//! `accounting_details` (per-account balance snapshots). `Db` wraps a single-connection pool;
//! the program opens one handle at startup and closes it on the way out.

mod migrations;

use crate::model::{NewSnapshot, Snapshot, Transaction};
use crate::Result;
use anyhow::{bail, Context};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// The schema version this build of the program requires.
const SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone)]
pub(crate) struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the schema at the current version
    pub(crate) async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database file already exists at '{}'", path.display());
        }
        let pool = connect(path, true).await?;

        sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .context("Failed to create the schema_version table")?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
            .execute(&pool)
            .await
            .context("Failed to record the initial schema version")?;

        migrations::run(&pool, 0, SCHEMA_VERSION).await?;
        Ok(Self { pool })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Opens it and migrates the schema forward if it is out-of-date
    pub(crate) async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("There is no database file at '{}'", path.display());
        }
        let pool = connect(path, false).await?;
        let current = schema_version(&pool).await?;
        migrations::run(&pool, current, SCHEMA_VERSION).await?;
        Ok(Self { pool })
    }

    /// Closes the underlying pool. Called on every exit path so the file handle is released
    /// regardless of how the program ends.
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }

    /// Appends one transaction row and returns the store-assigned id.
    ///
    /// The category is stored as text without membership checks; the fixed category set lives
    /// at the input boundary, not here.
    pub(crate) async fn insert_transaction(
        &self,
        date: &str,
        category: &str,
        amount: f64,
    ) -> Result<i64> {
        let result = sqlx::query("INSERT INTO transactions (date, category, amount) VALUES (?, ?, ?)")
            .bind(date)
            .bind(category)
            .bind(amount)
            .execute(&self.pool)
            .await
            .context("Failed to insert the transaction")?;
        let id = result.last_insert_rowid();
        debug!("Inserted transaction {id}");
        Ok(id)
    }

    /// The most recent `limit` transactions, newest first.
    ///
    /// Ordering is by id, never by the `date` column, which holds a display string that does
    /// not sort chronologically.
    pub(crate) async fn recent_transactions(&self, limit: u32) -> Result<Vec<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            "SELECT id, date, category, amount FROM transactions ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch recent transactions")
    }

    /// The most recent snapshot for `account_name`, if any exists.
    ///
    /// Ordered by the save timestamp; the id breaks ties between batches saved within the same
    /// second.
    pub(crate) async fn latest_snapshot(&self, account_name: &str) -> Result<Option<Snapshot>> {
        sqlx::query_as::<_, Snapshot>(
            "SELECT id, date, account_name, checking, savings, saver, kiwi_saver, total \
             FROM accounting_details WHERE account_name = ? ORDER BY date DESC, id DESC LIMIT 1",
        )
        .bind(account_name)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch the latest snapshot for {account_name}"))
    }

    /// Writes a batch of snapshot rows inside one transaction.
    ///
    /// A batch is one row per account from a single save; either all of them land or none do.
    pub(crate) async fn save_snapshots(&self, snapshots: &[NewSnapshot]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin the snapshot transaction")?;

        for snapshot in snapshots {
            sqlx::query(
                "INSERT INTO accounting_details \
                 (date, account_name, checking, savings, saver, kiwi_saver, total) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&snapshot.saved_at)
            .bind(&snapshot.account_name)
            .bind(snapshot.checking)
            .bind(snapshot.savings)
            .bind(snapshot.saver)
            .bind(snapshot.kiwi_saver)
            .bind(snapshot.total)
            .execute(&mut *tx)
            .await
            .with_context(|| {
                format!("Failed to insert the snapshot for {}", snapshot.account_name)
            })?;
        }

        tx.commit()
            .await
            .context("Failed to commit the snapshot transaction")?;
        debug!("Saved {} snapshot rows", snapshots.len());
        Ok(())
    }

    /// The distinct stored date strings, used solely to derive the months that have data.
    pub(crate) async fn distinct_transaction_dates(&self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT date FROM transactions")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch the distinct transaction dates")
    }

    /// Per-category sums over the transactions whose date ends with `suffix` (`Mon-YY`).
    ///
    /// A textual suffix match, not a calendar-range query. It is correct because the stored
    /// date format's trailing characters encode exactly the month and two-digit year.
    pub(crate) async fn sum_by_category_for_month(
        &self,
        suffix: &str,
    ) -> Result<BTreeMap<String, f64>> {
        let rows: Vec<(String, f64)> = sqlx::query_as(
            "SELECT category, SUM(amount) FROM transactions WHERE date LIKE ? GROUP BY category",
        )
        .bind(format!("%{suffix}"))
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to sum transactions for month suffix {suffix}"))?;
        Ok(rows.into_iter().collect())
    }
}

async fn connect(path: &Path, create_if_missing: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse the SQLite connection string")?
        .create_if_missing(create_if_missing);

    // One connection, mirroring the single process-wide handle of the ledger's access pattern.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Unable to open the SQLite database at {}", path.display()))
}

async fn schema_version(pool: &SqlitePool) -> Result<i32> {
    let row: (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Failed to query the schema version")?;
    Ok(row.0)
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_db() -> (TempDir, Db) {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::init(temp_dir.path().join("test.sqlite")).await.unwrap();
        (temp_dir, db)
    }

    fn snapshot(saved_at: &str, account_name: &str, checking: Option<f64>, total: f64) -> NewSnapshot {
        NewSnapshot {
            saved_at: saved_at.to_string(),
            account_name: account_name.to_string(),
            checking,
            savings: None,
            saver: None,
            kiwi_saver: None,
            total,
        }
    }

    #[tokio::test]
    async fn test_init_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.sqlite");

        let db = Db::init(&path).await.unwrap();
        db.close().await;

        let db = Db::load(&path).await.unwrap();
        assert!(db.recent_transactions(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_refuses_existing_file() {
        let (temp_dir, db) = test_db().await;
        db.close().await;
        assert!(Db::init(temp_dir.path().join("test.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_refuses_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Db::load(temp_dir.path().join("missing.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_appears_first_in_recent() {
        let (_temp_dir, db) = test_db().await;
        db.insert_transaction("01-Mar-24", "Food", 50.0).await.unwrap();
        let id = db.insert_transaction("02-Mar-24", "Rent", 1200.0).await.unwrap();

        let recent = db.recent_transactions(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, id);
        assert_eq!(recent[0].category, "Rent");
        assert_eq!(recent[0].amount, 1200.0);
    }

    #[tokio::test]
    async fn test_recent_is_bounded_and_ordered_by_id() {
        let (_temp_dir, db) = test_db().await;
        // Date strings deliberately do not sort in insertion order.
        for i in 0..12 {
            let date = if i % 2 == 0 { "28-Feb-24" } else { "01-Jan-24" };
            db.insert_transaction(date, "General", f64::from(i)).await.unwrap();
        }

        let recent = db.recent_transactions(10).await.unwrap();
        assert_eq!(recent.len(), 10);
        let ids: Vec<i64> = recent.iter().map(|t| t.id).collect();
        assert_eq!(ids, (3..=12).rev().collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_latest_snapshot_missing_account() {
        let (_temp_dir, db) = test_db().await;
        assert!(db.latest_snapshot("Primary").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_snapshot_returns_second_batch() {
        let (_temp_dir, db) = test_db().await;
        db.save_snapshots(&[snapshot("2024-03-01 08:00:00", "Primary", Some(100.0), 100.0)])
            .await
            .unwrap();
        db.save_snapshots(&[snapshot("2024-03-02 08:00:00", "Primary", Some(250.0), 250.0)])
            .await
            .unwrap();

        let latest = db.latest_snapshot("Primary").await.unwrap().unwrap();
        assert_eq!(latest.saved_at, "2024-03-02 08:00:00");
        assert_eq!(latest.checking, Some(250.0));
        assert_eq!(latest.total, 250.0);
    }

    #[tokio::test]
    async fn test_snapshot_batch_lands_for_every_account() {
        let (_temp_dir, db) = test_db().await;
        let batch = vec![
            snapshot("2024-03-01 08:00:00", "Primary", Some(1.0), 1.0),
            snapshot("2024-03-01 08:00:00", "Partner", Some(2.0), 2.0),
            snapshot("2024-03-01 08:00:00", "Joint", None, 0.0),
        ];
        db.save_snapshots(&batch).await.unwrap();

        for name in ["Primary", "Partner", "Joint"] {
            let row = db.latest_snapshot(name).await.unwrap().unwrap();
            assert_eq!(row.saved_at, "2024-03-01 08:00:00");
        }
        let joint = db.latest_snapshot("Joint").await.unwrap().unwrap();
        assert_eq!(joint.checking, None);
    }

    #[tokio::test]
    async fn test_sum_by_category_matches_month_suffix_only() {
        let (_temp_dir, db) = test_db().await;
        db.insert_transaction("01-Mar-24", "Food", 50.0).await.unwrap();
        db.insert_transaction("02-Apr-24", "Food", 30.0).await.unwrap();

        let sums = db.sum_by_category_for_month("Mar-24").await.unwrap();
        assert_eq!(sums.len(), 1);
        assert_eq!(sums.get("Food"), Some(&50.0));
    }

    #[tokio::test]
    async fn test_sum_by_category_groups_categories() {
        let (_temp_dir, db) = test_db().await;
        db.insert_transaction("01-Mar-24", "Food", 50.0).await.unwrap();
        db.insert_transaction("15-Mar-24", "Food", 25.0).await.unwrap();
        db.insert_transaction("20-Mar-24", "Rent", 1200.0).await.unwrap();

        let sums = db.sum_by_category_for_month("Mar-24").await.unwrap();
        assert_eq!(sums.get("Food"), Some(&75.0));
        assert_eq!(sums.get("Rent"), Some(&1200.0));
    }

    #[tokio::test]
    async fn test_distinct_transaction_dates() {
        let (_temp_dir, db) = test_db().await;
        db.insert_transaction("01-Mar-24", "Food", 1.0).await.unwrap();
        db.insert_transaction("01-Mar-24", "Rent", 2.0).await.unwrap();
        db.insert_transaction("15-Apr-24", "Food", 3.0).await.unwrap();

        let mut dates = db.distinct_transaction_dates().await.unwrap();
        dates.sort();
        assert_eq!(dates, vec!["01-Mar-24", "15-Apr-24"]);
    }
}
