use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{Doctor, DoctorFilters, UserRole};

const DOCTOR_COLUMNS: &str =
    "id, name, email, specialization, city, experience, qualifications, available_slots";

/// Filter value meaning "no restriction".
pub const ANY_FILTER: &str = "All";

fn row_to_doctor(row: &rusqlite::Row) -> Result<Doctor, rusqlite::Error> {
    let slots: String = row.get(7)?;
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        specialization: row.get(3)?,
        city: row.get(4)?,
        experience: row.get(5)?,
        qualifications: row.get(6)?,
        available_slots: serde_json::from_str(&slots)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?,
    })
}

/// `None`, blank and "All" all mean the filter is not applied.
fn active_filter(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != ANY_FILTER)
}

/// Doctors matching both filters exactly, in directory order.
pub fn search_doctors(
    conn: &Connection,
    specialization: Option<&str>,
    city: Option<&str>,
) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors
         WHERE (?1 IS NULL OR specialization = ?1) AND (?2 IS NULL OR city = ?2)
         ORDER BY rowid"
    ))?;
    let rows = stmt.query_map(
        params![active_filter(specialization), active_filter(city)],
        row_to_doctor,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_doctor(conn: &Connection, id: &str) -> Result<Option<Doctor>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
        params![id],
        row_to_doctor,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Distinct specializations and cities, each in order of first appearance.
pub fn doctor_filters(conn: &Connection) -> Result<DoctorFilters, DatabaseError> {
    let distinct = |column: &str| -> Result<Vec<String>, DatabaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {column} FROM doctors GROUP BY {column} ORDER BY MIN(rowid)"
        ))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
    };

    Ok(DoctorFilters {
        specializations: distinct("specialization")?,
        cities: distinct("city")?,
    })
}

/// Users listed in the doctor directory act as doctors; everyone else is a patient.
pub fn user_role(conn: &Connection, user_id: &str) -> Result<UserRole, DatabaseError> {
    let is_doctor: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM doctors WHERE id = ?1)",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(if is_doctor { UserRole::Doctor } else { UserRole::Patient })
}
