//! Database schema migrations.
//!
//! Migration files live in this directory as `migration_NN_up.sql` / `migration_NN_down.sql`
//! pairs and are embedded into the binary. The `schema_version` table records the version the
//! database is currently at; each step is applied together with its version bump in one
//! transaction.

use anyhow::{bail, Context};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

use crate::Result;

/// One schema step. `version` is the version the database is at after going up.
struct Migration {
    version: i32,
    up_sql: &'static str,
    down_sql: &'static str,
}

/// All available migrations in order.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    up_sql: include_str!("migration_01_up.sql"),
    down_sql: include_str!("migration_01_down.sql"),
}];

fn find(version: i32) -> Result<&'static Migration> {
    match MIGRATIONS.iter().find(|m| m.version == version) {
        Some(m) => Ok(m),
        None => bail!("Migration {version} is required but does not exist"),
    }
}

/// Brings the database from `current_ver` to `target_ver`, stepping up or down as needed.
///
/// Every required step is checked for existence before any SQL runs, so a gap in the migration
/// list cannot leave the schema half-moved.
pub(crate) async fn run(pool: &SqlitePool, current_ver: i32, target_ver: i32) -> Result<()> {
    if current_ver == target_ver {
        debug!("Database already at schema version {target_ver}");
        return Ok(());
    }

    if current_ver < target_ver {
        let steps = ((current_ver + 1)..=target_ver).collect::<Vec<_>>();
        for version in &steps {
            find(*version)?;
        }
        for version in steps {
            debug!("Applying migration {version:02} (up)");
            apply(pool, find(version)?.up_sql, version).await?;
        }
    } else {
        let steps = ((target_ver + 1)..=current_ver).rev().collect::<Vec<_>>();
        for version in &steps {
            find(*version)?;
        }
        for version in steps {
            debug!("Applying migration {version:02} (down)");
            apply(pool, find(version)?.down_sql, version - 1).await?;
        }
    }

    debug!("Schema now at version {target_ver}");
    Ok(())
}

/// Executes one migration's SQL and records `new_version`, all in a single transaction.
async fn apply(pool: &SqlitePool, sql: &str, new_version: i32) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin the migration transaction")?;

    // The SQL files contain multiple statements, so go through Executor rather than query().
    tx.execute(sql)
        .await
        .context("Failed to execute the migration SQL")?;

    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *tx)
        .await
        .context("Failed to clear schema_version")?;
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(new_version)
        .execute(&mut *tx)
        .await
        .context("Failed to record the new schema version")?;

    tx.commit()
        .await
        .context("Failed to commit the migration transaction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{bootstrap_schema_version, open};
    use anyhow::Context;
    use tempfile::TempDir;

    async fn create_test_db() -> Result<(TempDir, SqlitePool)> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        let pool = open(&temp_dir.path().join("test.sqlite"), true).await?;
        bootstrap_schema_version(&pool).await?;
        Ok((temp_dir, pool))
    }

    async fn get_schema_version(pool: &SqlitePool) -> i32 {
        let row: (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(pool)
            .await
            .unwrap();
        row.0
    }

    async fn table_exists(pool: &SqlitePool, table_name: &str) -> bool {
        let row: (i32,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?")
                .bind(table_name)
                .fetch_one(pool)
                .await
                .unwrap();
        row.0 > 0
    }

    #[tokio::test]
    async fn test_migration_up_creates_tables() {
        let (_temp_dir, pool) = create_test_db().await.unwrap();
        assert_eq!(get_schema_version(&pool).await, 0);

        run(&pool, 0, 1).await.unwrap();

        assert_eq!(get_schema_version(&pool).await, 1);
        assert!(table_exists(&pool, "transactions").await);
        assert!(table_exists(&pool, "accounting_details").await);
    }

    #[tokio::test]
    async fn test_migration_down_drops_tables() {
        let (_temp_dir, pool) = create_test_db().await.unwrap();
        run(&pool, 0, 1).await.unwrap();

        run(&pool, 1, 0).await.unwrap();

        assert_eq!(get_schema_version(&pool).await, 0);
        assert!(!table_exists(&pool, "transactions").await);
        assert!(!table_exists(&pool, "accounting_details").await);
    }

    #[tokio::test]
    async fn test_migration_no_op_when_already_at_target() {
        let (_temp_dir, pool) = create_test_db().await.unwrap();
        run(&pool, 0, 1).await.unwrap();

        run(&pool, 1, 1).await.unwrap();

        assert_eq!(get_schema_version(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_missing_migration_is_an_error() {
        let (_temp_dir, pool) = create_test_db().await.unwrap();
        assert!(run(&pool, 0, 2).await.is_err());
        // Nothing should have been applied.
        assert_eq!(get_schema_version(&pool).await, 0);
        assert!(!table_exists(&pool, "transactions").await);
    }
}
