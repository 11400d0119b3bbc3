use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

const LAST_USERNAME_KEY: &str = "last_username";

/// Creates the settings table if it doesn't exist yet.
pub fn init_db(db_path: &Path) -> Result<()> {
    let connection = Connection::open(db_path)?;
    connection
        .execute(
            "CREATE TABLE IF NOT EXISTS search (key TEXT PRIMARY KEY, value TEXT NOT NULL);",
            [],
        )
        .context("Failed to create search table")?;
    Ok(())
}

/// Returns the username of the last successful search, if any.
pub fn load_last_username(db_path: &Path) -> Result<Option<String>> {
    let connection = Connection::open(db_path)?;
    let mut statement = connection.prepare("SELECT value FROM search WHERE key = ?1")?;
    let mut rows = statement.query(rusqlite::params![LAST_USERNAME_KEY])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

/// Saved only after a refresh fully succeeds, so the next start reopens the
/// last identity that actually rendered.
pub fn save_last_username(db_path: &Path, username: &str) -> Result<()> {
    let connection = Connection::open(db_path)?;
    connection
        .execute(
            "INSERT OR REPLACE INTO search (key, value) VALUES (?1, ?2);",
            rusqlite::params![LAST_USERNAME_KEY, username],
        )
        .context("Failed to save last username")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempDb {
        path: PathBuf,
    }

    impl TempDb {
        fn new(tag: &str) -> Result<TempDb> {
            let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
            let path = std::env::temp_dir().join(format!(
                "chess_dashboard_test_{}_{}_{}.db",
                tag,
                std::process::id(),
                nanos
            ));
            init_db(&path)?;
            Ok(TempDb { path })
        }
    }

    impl Drop for TempDb {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    #[test]
    fn test_load_on_fresh_db_is_none() -> Result<()> {
        let db = TempDb::new("fresh")?;
        assert_eq!(load_last_username(&db.path)?, None);
        Ok(())
    }

    #[test]
    fn test_save_then_load_round_trip() -> Result<()> {
        let db = TempDb::new("roundtrip")?;
        save_last_username(&db.path, "peeves73")?;
        assert_eq!(load_last_username(&db.path)?, Some("peeves73".to_string()));
        Ok(())
    }

    #[test]
    fn test_save_replaces_previous_value() -> Result<()> {
        let db = TempDb::new("replace")?;
        save_last_username(&db.path, "first")?;
        save_last_username(&db.path, "second")?;
        assert_eq!(load_last_username(&db.path)?, Some("second".to_string()));
        Ok(())
    }
}
