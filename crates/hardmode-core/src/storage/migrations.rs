//! Database schema migrations for hardmode.
//!
//! Migrations are versioned and applied automatically when opening the store.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (initial database).
pub(crate) fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> SqliteResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Migration v1: baseline. Tables are created by `Store::migrate` directly.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    set_schema_version(conn, 1)
}

/// Migration v2: per-interval pause counter on ledger entries.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    if !has_column(&tx, "pomo", "pause_count")? {
        tx.execute_batch("ALTER TABLE pomo ADD COLUMN pause_count INTEGER NOT NULL DEFAULT 0;")?;
    }

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    tracing::info!(version = 2, "applied schema migration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_pomo_table(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE pomo (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                day_id       INTEGER NOT NULL,
                start_time   TEXT NOT NULL,
                duration_sec INTEGER NOT NULL,
                task         TEXT NOT NULL
            );",
        )
        .unwrap();
    }

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        legacy_pomo_table(&conn);
        conn.execute(
            "INSERT INTO pomo (day_id, start_time, duration_sec, task)
             VALUES (1, '2024-01-01T09:00:00+00:00', 1500, 'Old entry')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        let pauses: i64 = conn
            .query_row("SELECT pause_count FROM pomo WHERE task = 'Old entry'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(pauses, 0);
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        legacy_pomo_table(&conn);

        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_incremental_migration_skips_existing_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY);
             INSERT INTO schema_version (version) VALUES (1);
             CREATE TABLE pomo (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                task        TEXT NOT NULL,
                pause_count INTEGER NOT NULL DEFAULT 0
             );",
        )
        .unwrap();

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 2);
        assert!(has_column(&conn, "pomo", "pause_count").unwrap());
    }
}
