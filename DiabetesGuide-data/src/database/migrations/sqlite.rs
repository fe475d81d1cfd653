use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Running SQLite migrations");

    create_patient_profiles_table(conn)?;
    create_patient_profiles_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the patient profiles table
fn create_patient_profiles_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Creating patient_profiles table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS patient_profiles (
            id TEXT PRIMARY KEY,
            name TEXT,
            age INTEGER NOT NULL,
            hba1c INTEGER NOT NULL,
            weight_kg REAL NOT NULL,
            blood_pressure TEXT,
            ethnicity TEXT NOT NULL,
            activity_level TEXT NOT NULL,
            smoker INTEGER NOT NULL DEFAULT 0,
            family_history INTEGER NOT NULL DEFAULT 0,
            medications TEXT,
            consent_recorded_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Create index on creation time for listing
fn create_patient_profiles_index(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Creating index on created_at");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_patient_profiles_created_at
        ON patient_profiles (created_at DESC)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'patient_profiles'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
