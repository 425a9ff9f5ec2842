//! SQLite storage for reader preferences
//!
//! Migrations are compiled into the binary and tracked in a
//! `schema_migrations` table, so a database created by an older build is
//! brought up to date on open.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

use sfoglia::PreferenceStore;

/// Ordered `(version, sql)` pairs.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_preferences",
    include_str!("../db/migrations/001_preferences.sql"),
)];

/// Open (creating if needed) the database at the given path and run any
/// pending migrations
pub fn init_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let count = run_migrations(&conn)?;
    if count > 0 {
        info!(count = count, "Applied migrations");
    }

    Ok(conn)
}

/// Run pending migrations, returning how many were applied
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY NOT NULL,
            applied_at TEXT NOT NULL
        );",
    )
    .context("Failed to create schema_migrations table")?;

    let mut applied = 0;

    for (version, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
            [version],
            |row| row.get(0),
        )?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .with_context(|| format!("Failed to apply migration: {}", version))?;

        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, datetime('now'))",
            [version],
        )?;

        debug!(version = %version, "Applied migration");
        applied += 1;
    }

    Ok(applied)
}

/// Read a preference value
pub fn get_preference(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to read preference `{key}`"))?;
    Ok(value)
}

/// Insert or replace a preference value
pub fn set_preference(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )
    .with_context(|| format!("Failed to write preference `{key}`"))?;
    Ok(())
}

/// When a preference was last written, as SQLite `datetime` text
pub fn preference_updated_at(conn: &Connection, key: &str) -> Result<Option<String>> {
    let updated_at = conn
        .query_row(
            "SELECT updated_at FROM preferences WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(updated_at)
}

/// [`PreferenceStore`] backed by the preferences table, so the CLI and the
/// page components share one notion of "the stored theme".
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self::new(init_db(db_path)?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl PreferenceStore for SqliteStore {
    fn load(&self, key: &str) -> sfoglia::Result<Option<String>> {
        get_preference(&self.conn, key).map_err(|e| sfoglia::Error::Storage(format!("{e:#}")))
    }

    fn save(&self, key: &str, value: &str) -> sfoglia::Result<()> {
        set_preference(&self.conn, key, value).map_err(|e| sfoglia::Error::Storage(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfoglia::theme::{stored_theme, THEME_KEY};
    use sfoglia::Theme;
    use tempfile::TempDir;

    fn setup_test_db() -> (TempDir, Connection) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let conn = init_db(&db_path).unwrap();
        (temp_dir, conn)
    }

    // ========== Migration tests ==========

    #[test]
    fn test_init_db_creates_tables() {
        let (_temp_dir, conn) = setup_test_db();

        let table_exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='preferences'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(table_exists);
    }

    #[test]
    fn test_migrations_recorded_once() {
        let (_temp_dir, conn) = setup_test_db();

        assert_eq!(run_migrations(&conn).unwrap(), 0);

        let recorded: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(recorded, MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_init_db_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("state").join("prefs.db");

        init_db(&db_path).unwrap();
        assert!(db_path.exists());
    }

    // ========== Preference tests ==========

    #[test]
    fn test_missing_preference() {
        let (_temp_dir, conn) = setup_test_db();
        assert_eq!(get_preference(&conn, "theme").unwrap(), None);
        assert_eq!(preference_updated_at(&conn, "theme").unwrap(), None);
    }

    #[test]
    fn test_set_and_overwrite_preference() {
        let (_temp_dir, conn) = setup_test_db();

        set_preference(&conn, "theme", "dark").unwrap();
        assert_eq!(get_preference(&conn, "theme").unwrap().as_deref(), Some("dark"));

        set_preference(&conn, "theme", "light").unwrap();
        assert_eq!(get_preference(&conn, "theme").unwrap().as_deref(), Some("light"));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM preferences", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert!(preference_updated_at(&conn, "theme").unwrap().is_some());
    }

    #[test]
    fn test_preferences_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("prefs.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.save(THEME_KEY, "dark").unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(stored_theme(&store), Theme::Dark);
    }

    #[test]
    fn test_store_reports_storage_errors() {
        let (_temp_dir, conn) = setup_test_db();
        conn.execute_batch("DROP TABLE preferences;").unwrap();
        let store = SqliteStore::new(conn);

        assert!(matches!(store.load(THEME_KEY), Err(sfoglia::Error::Storage(_))));
        // Unreadable preference falls back to the default theme
        assert_eq!(stored_theme(&store), Theme::Light);
    }
}
