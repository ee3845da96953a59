use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{format_date, format_timestamp, parse_date, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentDetails, AppointmentStatus, UserRole};

const APPOINTMENT_COLUMNS: &str =
    "a.id, a.patient_id, a.doctor_id, a.date, a.time_slot, a.reason, a.status, a.created_at";

/// Raw row; the status column is decoded afterwards so a bad value surfaces
/// as `DatabaseError::InvalidEnum`.
struct AppointmentRow {
    id: Uuid,
    patient_id: String,
    doctor_id: String,
    date: NaiveDate,
    time_slot: String,
    reason: Option<String>,
    status: String,
    created_at: NaiveDateTime,
    doctor_name: String,
    doctor_specialization: String,
}

impl TryFrom<AppointmentRow> for AppointmentDetails {
    type Error = DatabaseError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(AppointmentDetails {
            appointment: Appointment {
                id: row.id,
                patient_id: row.patient_id,
                doctor_id: row.doctor_id,
                date: row.date,
                time_slot: row.time_slot,
                reason: row.reason,
                status: row.status.parse::<AppointmentStatus>()?,
                created_at: row.created_at,
            },
            doctor_name: row.doctor_name,
            doctor_specialization: row.doctor_specialization,
        })
    }
}

fn read_appointment_row(row: &rusqlite::Row) -> Result<AppointmentRow, rusqlite::Error> {
    let id: String = row.get(0)?;
    let date: String = row.get(3)?;
    let created_at: String = row.get(7)?;
    Ok(AppointmentRow {
        id: parse_uuid(0, &id)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        date: parse_date(3, &date)?,
        time_slot: row.get(4)?,
        reason: row.get(5)?,
        status: row.get(6)?,
        created_at: parse_timestamp(7, &created_at)?,
        doctor_name: row.get(8)?,
        doctor_specialization: row.get(9)?,
    })
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, date, time_slot, reason, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            appt.id.to_string(),
            appt.patient_id,
            appt.doctor_id,
            format_date(&appt.date),
            appt.time_slot,
            appt.reason,
            appt.status.as_str(),
            format_timestamp(&appt.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<AppointmentDetails>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {APPOINTMENT_COLUMNS}, d.name, d.specialization
                 FROM appointments a JOIN doctors d ON d.id = a.doctor_id
                 WHERE a.id = ?1"
            ),
            params![id.to_string()],
            read_appointment_row,
        )
        .optional()?;
    row.map(AppointmentDetails::try_from).transpose()
}

/// Appointments where the user is the patient or, for doctors, the doctor.
/// Ordered by appointment date, then booking time.
pub fn list_appointments_for_user(
    conn: &Connection,
    user_id: &str,
    role: UserRole,
) -> Result<Vec<AppointmentDetails>, DatabaseError> {
    let owner = match role {
        UserRole::Patient => "a.patient_id",
        UserRole::Doctor => "a.doctor_id",
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS}, d.name, d.specialization
         FROM appointments a JOIN doctors d ON d.id = a.doctor_id
         WHERE {owner} = ?1
         ORDER BY a.date ASC, a.created_at ASC, a.rowid ASC"
    ))?;
    let rows = stmt
        .query_map(params![user_id], read_appointment_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(AppointmentDetails::try_from).collect()
}

/// Whether the doctor already has a booking in that slot on that date.
pub fn is_slot_taken(
    conn: &Connection,
    doctor_id: &str,
    date: &NaiveDate,
    time_slot: &str,
) -> Result<bool, DatabaseError> {
    let taken = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM appointments WHERE doctor_id = ?1 AND date = ?2 AND time_slot = ?3)",
        params![doctor_id, format_date(date), time_slot],
        |row| row.get(0),
    )?;
    Ok(taken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn make_appointment(patient: &str, doctor: &str, day: u32, slot: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: patient.into(),
            doctor_id: doctor.into(),
            date: NaiveDate::from_ymd_opt(2026, 11, day).unwrap(),
            time_slot: slot.into(),
            reason: Some("Follow-up".into()),
            status: AppointmentStatus::Confirmed,
            created_at: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn insert_and_get_with_doctor_details() {
        let conn = open_memory_database().unwrap();
        let appt = make_appointment("patient-1", "doc1", 3, "9:00 AM");
        insert_appointment(&conn, &appt).unwrap();

        let loaded = get_appointment(&conn, &appt.id).unwrap().unwrap();
        assert_eq!(loaded.appointment, appt);
        assert_eq!(loaded.doctor_name, "Dr. Sarah Johnson");
        assert_eq!(loaded.doctor_specialization, "Cardiology");
    }

    #[test]
    fn unknown_doctor_is_rejected_by_foreign_key() {
        let conn = open_memory_database().unwrap();
        let appt = make_appointment("patient-1", "doc99", 3, "9:00 AM");
        assert!(matches!(insert_appointment(&conn, &appt), Err(DatabaseError::Sqlite(_))));
    }

    #[test]
    fn listing_follows_role() {
        let conn = open_memory_database().unwrap();
        let later = make_appointment("patient-1", "doc1", 20, "9:00 AM");
        let sooner = make_appointment("patient-1", "doc2", 5, "2:00 PM");
        let other = make_appointment("patient-2", "doc1", 12, "10:00 AM");
        for appt in [&later, &sooner, &other] {
            insert_appointment(&conn, appt).unwrap();
        }

        let patient: Vec<Uuid> = list_appointments_for_user(&conn, "patient-1", UserRole::Patient)
            .unwrap()
            .iter()
            .map(|a| a.appointment.id)
            .collect();
        assert_eq!(patient, vec![sooner.id, later.id]);

        let doctor: Vec<Uuid> = list_appointments_for_user(&conn, "doc1", UserRole::Doctor)
            .unwrap()
            .iter()
            .map(|a| a.appointment.id)
            .collect();
        assert_eq!(doctor, vec![other.id, later.id]);

        assert!(list_appointments_for_user(&conn, "doc1", UserRole::Patient).unwrap().is_empty());
    }

    #[test]
    fn slot_is_taken_per_doctor_and_date() {
        let conn = open_memory_database().unwrap();
        let appt = make_appointment("patient-1", "doc1", 3, "9:00 AM");
        insert_appointment(&conn, &appt).unwrap();

        assert!(is_slot_taken(&conn, "doc1", &appt.date, "9:00 AM").unwrap());
        assert!(!is_slot_taken(&conn, "doc1", &appt.date, "10:00 AM").unwrap());
        assert!(!is_slot_taken(&conn, "doc4", &appt.date, "9:00 AM").unwrap());
    }

    #[test]
    fn corrupt_status_surfaces_invalid_enum() {
        let conn = open_memory_database().unwrap();
        let appt = make_appointment("patient-1", "doc1", 3, "9:00 AM");
        insert_appointment(&conn, &appt).unwrap();
        conn.execute("UPDATE appointments SET status = 'pending'", []).unwrap();

        let err = get_appointment(&conn, &appt.id).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }
}
