use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{VitalsEntry, VitalsRecord};

const VITALS_COLUMNS: &str = "report_id, user_id, recorded_at, systolic, diastolic, blood_pressure,
     blood_sugar, heart_rate, temperature, weight, cholesterol, hba1c";

/// Insert the vitals extracted from one report.
pub fn insert_vitals_entry(conn: &Connection, entry: &VitalsEntry) -> Result<(), DatabaseError> {
    let v = &entry.vitals;
    conn.execute(
        &format!(
            "INSERT INTO vitals_entries ({VITALS_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        params![
            entry.report_id.to_string(),
            entry.user_id,
            format_timestamp(&entry.recorded_at),
            v.systolic,
            v.diastolic,
            v.blood_pressure,
            v.blood_sugar,
            v.heart_rate,
            v.temperature,
            v.weight,
            v.cholesterol,
            v.hba1c,
        ],
    )?;
    Ok(())
}

/// All vitals entries for a user, ordered by recorded_at ascending.
pub fn list_vitals_for_user(conn: &Connection, user_id: &str) -> Result<Vec<VitalsEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {VITALS_COLUMNS} FROM vitals_entries
         WHERE user_id = ?1
         ORDER BY recorded_at ASC, rowid ASC"
    ))?;
    let rows = stmt.query_map(params![user_id], row_to_vitals_entry)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_vitals_for_report(
    conn: &Connection,
    report_id: &Uuid,
) -> Result<Option<VitalsEntry>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {VITALS_COLUMNS} FROM vitals_entries WHERE report_id = ?1"),
        params![report_id.to_string()],
        row_to_vitals_entry,
    )
    .optional()
    .map_err(DatabaseError::from)
}

fn row_to_vitals_entry(row: &rusqlite::Row) -> Result<VitalsEntry, rusqlite::Error> {
    let report_id: String = row.get(0)?;
    let recorded_at: String = row.get(2)?;

    Ok(VitalsEntry {
        report_id: parse_uuid(0, &report_id)?,
        user_id: row.get(1)?,
        recorded_at: parse_timestamp(2, &recorded_at)?,
        vitals: VitalsRecord {
            systolic: row.get(3)?,
            diastolic: row.get(4)?,
            blood_pressure: row.get(5)?,
            blood_sugar: row.get(6)?,
            heart_rate: row.get(7)?,
            temperature: row.get(8)?,
            weight: row.get(9)?,
            cholesterol: row.get(10)?,
            hba1c: row.get(11)?,
        },
    })
}
