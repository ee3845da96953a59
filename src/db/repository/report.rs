use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{ExtractionMethod, Report, ReportType, VitalsRecord};

const REPORT_COLUMNS: &str = "id, user_id, file_name, file_type, report_type, report_label,
     uploaded_at, extraction_method, report_text, vitals_json";

/// Raw column values; enum and JSON columns are decoded after the row is read
/// so their failures surface as `DatabaseError` rather than rusqlite errors.
struct ReportRow {
    id: Uuid,
    user_id: String,
    file_name: String,
    file_type: String,
    report_type: String,
    report_label: String,
    uploaded_at: chrono::NaiveDateTime,
    extraction_method: String,
    report_text: String,
    vitals_json: String,
}

impl TryFrom<ReportRow> for Report {
    type Error = DatabaseError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Report {
            id: row.id,
            user_id: row.user_id,
            file_name: row.file_name,
            file_type: row.file_type,
            report_type: row.report_type.parse::<ReportType>()?,
            report_label: row.report_label,
            uploaded_at: row.uploaded_at,
            extraction_method: row.extraction_method.parse::<ExtractionMethod>()?,
            report_text: row.report_text,
            vitals: serde_json::from_str::<VitalsRecord>(&row.vitals_json)?,
        })
    }
}

fn read_report_row(row: &rusqlite::Row) -> Result<ReportRow, rusqlite::Error> {
    let id: String = row.get(0)?;
    let uploaded_at: String = row.get(6)?;
    Ok(ReportRow {
        id: parse_uuid(0, &id)?,
        user_id: row.get(1)?,
        file_name: row.get(2)?,
        file_type: row.get(3)?,
        report_type: row.get(4)?,
        report_label: row.get(5)?,
        uploaded_at: parse_timestamp(6, &uploaded_at)?,
        extraction_method: row.get(7)?,
        report_text: row.get(8)?,
        vitals_json: row.get(9)?,
    })
}

pub fn insert_report(conn: &Connection, report: &Report) -> Result<(), DatabaseError> {
    conn.execute(
        &format!("INSERT INTO reports ({REPORT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
        params![
            report.id.to_string(),
            report.user_id,
            report.file_name,
            report.file_type,
            report.report_type.as_str(),
            report.report_label,
            format_timestamp(&report.uploaded_at),
            report.extraction_method.as_str(),
            report.report_text,
            serde_json::to_string(&report.vitals)?,
        ],
    )?;
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Option<Report>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
            params![id.to_string()],
            read_report_row,
        )
        .optional()?;
    row.map(Report::try_from).transpose()
}

/// All reports uploaded by a user, newest first.
pub fn list_reports_for_user(conn: &Connection, user_id: &str) -> Result<Vec<Report>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM reports
         WHERE user_id = ?1
         ORDER BY uploaded_at DESC, rowid DESC"
    ))?;
    let rows = stmt
        .query_map(params![user_id], read_report_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(Report::try_from).collect()
}

/// Delete a report. Its vitals entry goes with it (ON DELETE CASCADE).
pub fn delete_report(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM reports WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "report".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
