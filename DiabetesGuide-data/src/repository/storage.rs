use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::models::patient_profile::PatientProfileRecord;
use crate::database::DatabasePool;
use super::errors::RepositoryError;

const SELECT_COLUMNS: &str = "SELECT id, name, age, hba1c, weight_kg, blood_pressure, ethnicity,
    activity_level, smoker, family_history, medications, consent_recorded_at, created_at, updated_at
    FROM patient_profiles";

/// Database storage operations for patient profiles
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Insert or replace a profile in the database
    pub async fn store_profile(pool: &DatabasePool, profile: &PatientProfileRecord) -> Result<(), RepositoryError> {
        debug!("Storing patient profile in database: id={}", profile.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    "INSERT OR REPLACE INTO patient_profiles
                     (id, name, age, hba1c, weight_kg, blood_pressure, ethnicity, activity_level,
                      smoker, family_history, medications, consent_recorded_at, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                    params![
                        &profile.id,
                        &profile.name,
                        profile.age,
                        profile.hba1c,
                        profile.weight_kg,
                        &profile.blood_pressure,
                        &profile.ethnicity,
                        &profile.activity_level,
                        profile.smoker,
                        profile.family_history,
                        &profile.medications,
                        &profile.consent_recorded_at,
                        &profile.created_at,
                        &profile.updated_at,
                    ],
                )?;

                Ok(())
            },
        }
    }

    /// Get all profiles from the database, newest first
    pub async fn get_all(pool: &DatabasePool) -> Result<Vec<PatientProfileRecord>, RepositoryError> {
        debug!("Getting all patient profiles from database");

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!("{} ORDER BY created_at DESC, id ASC", SELECT_COLUMNS))?;
                let rows = stmt.query_map([], map_row)?;

                let mut result = Vec::new();
                for row in rows {
                    result.push(row?);
                }

                Ok(result)
            },
        }
    }

    /// Get a profile by id from the database
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<PatientProfileRecord>, RepositoryError> {
        debug!("Getting patient profile from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let profile = conn
                    .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id], map_row)
                    .optional()?;

                Ok(profile)
            },
        }
    }

    /// Delete a profile from the database, returning whether a row was removed
    pub async fn delete(pool: &DatabasePool, id: &str) -> Result<bool, RepositoryError> {
        debug!("Deleting patient profile from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let removed = conn.execute("DELETE FROM patient_profiles WHERE id = ?1", params![id])?;
                Ok(removed > 0)
            },
        }
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<PatientProfileRecord> {
    Ok(PatientProfileRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        hba1c: row.get(3)?,
        weight_kg: row.get(4)?,
        blood_pressure: row.get(5)?,
        ethnicity: row.get(6)?,
        activity_level: row.get(7)?,
        smoker: row.get(8)?,
        family_history: row.get(9)?,
        medications: row.get(10)?,
        consent_recorded_at: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}
