use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{ChatEntry, ChatMessage, UserRole};

pub fn insert_message(conn: &Connection, msg: &ChatMessage) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO chat_messages (id, appointment_id, sender_id, message, sent_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            msg.id.to_string(),
            msg.appointment_id.to_string(),
            msg.sender_id,
            msg.message,
            format_timestamp(&msg.sent_at),
        ],
    )?;
    Ok(())
}

/// Messages posted on an appointment, oldest first. Senders found in the
/// doctor directory carry their name and the doctor role.
pub fn list_messages_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<ChatEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.appointment_id, m.sender_id, m.message, m.sent_at, d.name
         FROM chat_messages m LEFT JOIN doctors d ON d.id = m.sender_id
         WHERE m.appointment_id = ?1
         ORDER BY m.sent_at ASC, m.rowid ASC",
    )?;

    let rows = stmt.query_map(params![appointment_id.to_string()], |row| {
        let id: String = row.get(0)?;
        let appointment_id: String = row.get(1)?;
        let sent_at: String = row.get(4)?;
        let sender_name: Option<String> = row.get(5)?;
        Ok(ChatEntry {
            message: ChatMessage {
                id: parse_uuid(0, &id)?,
                appointment_id: parse_uuid(1, &appointment_id)?,
                sender_id: row.get(2)?,
                message: row.get(3)?,
                sent_at: parse_timestamp(4, &sent_at)?,
            },
            sender_role: if sender_name.is_some() { UserRole::Doctor } else { UserRole::Patient },
            sender_name,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_appointment;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Appointment, AppointmentStatus};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 2).unwrap().and_hms_opt(14, minute, 0).unwrap()
    }

    fn booked(conn: &Connection) -> Uuid {
        let appt = Appointment {
            id: Uuid::new_v4(),
            patient_id: "patient-1".into(),
            doctor_id: "doc3".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 9).unwrap(),
            time_slot: "1:00 PM".into(),
            reason: None,
            status: AppointmentStatus::Confirmed,
            created_at: at(0),
        };
        insert_appointment(conn, &appt).unwrap();
        appt.id
    }

    fn message(appointment_id: Uuid, sender: &str, text: &str, minute: u32) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            appointment_id,
            sender_id: sender.into(),
            message: text.into(),
            sent_at: at(minute),
        }
    }

    #[test]
    fn messages_list_oldest_first() {
        let conn = open_memory_database().unwrap();
        let appt = booked(&conn);
        insert_message(&conn, &message(appt, "doc3", "See you Friday.", 30)).unwrap();
        insert_message(&conn, &message(appt, "patient-1", "Should I fast before?", 10)).unwrap();

        let listed = list_messages_for_appointment(&conn, &appt).unwrap();
        let texts: Vec<&str> = listed.iter().map(|m| m.message.message.as_str()).collect();
        assert_eq!(texts, vec!["Should I fast before?", "See you Friday."]);
    }

    #[test]
    fn sender_details_come_from_directory() {
        let conn = open_memory_database().unwrap();
        let appt = booked(&conn);
        insert_message(&conn, &message(appt, "patient-1", "Hello", 1)).unwrap();
        insert_message(&conn, &message(appt, "doc3", "Hi", 2)).unwrap();

        let listed = list_messages_for_appointment(&conn, &appt).unwrap();
        assert_eq!(listed[0].sender_role, UserRole::Patient);
        assert_eq!(listed[0].sender_name, None);
        assert_eq!(listed[1].sender_role, UserRole::Doctor);
        assert_eq!(listed[1].sender_name.as_deref(), Some("Dr. Emily Rodriguez"));
    }

    #[test]
    fn messages_are_scoped_to_appointment() {
        let conn = open_memory_database().unwrap();
        let first = booked(&conn);
        let second = booked(&conn);
        insert_message(&conn, &message(first, "patient-1", "one", 1)).unwrap();

        assert_eq!(list_messages_for_appointment(&conn, &first).unwrap().len(), 1);
        assert!(list_messages_for_appointment(&conn, &second).unwrap().is_empty());
    }

    #[test]
    fn message_for_missing_appointment_is_rejected() {
        let conn = open_memory_database().unwrap();
        let orphan = message(Uuid::new_v4(), "patient-1", "anyone?", 1);
        assert!(matches!(insert_message(&conn, &orphan), Err(DatabaseError::Sqlite(_))));
    }
}
