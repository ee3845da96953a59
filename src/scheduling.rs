//! Appointment booking and per-appointment chat on top of the doctor
//! directory.
//!
//! Users are opaque ids. A user whose id is in the doctor directory acts as
//! that doctor; any other id is a patient. Only the two participants of an
//! appointment may read or post its messages.

use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::models::{Appointment, AppointmentDetails, AppointmentStatus, ChatEntry, ChatMessage};

// ─── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("No user id given")]
    MissingUser,

    #[error("Unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("Doctor {doctor_id} has no {time_slot} slot")]
    SlotUnavailable { doctor_id: String, time_slot: String },

    #[error("Doctor {doctor_id} is already booked at {time_slot} on {date}")]
    SlotTaken {
        doctor_id: String,
        date: NaiveDate,
        time_slot: String,
    },

    #[error("Message is empty")]
    EmptyMessage,

    #[error("User {user_id} is not part of appointment {appointment_id}")]
    NotParticipant { user_id: String, appointment_id: Uuid },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for SchedulingError {
    fn from(e: rusqlite::Error) -> Self {
        SchedulingError::Database(DatabaseError::Sqlite(e))
    }
}

/// A patient's booking as received from the caller.
#[derive(Debug, Clone)]
pub struct BookingRequest<'a> {
    pub doctor_id: &'a str,
    pub date: NaiveDate,
    /// Must be one of the doctor's available slot labels.
    pub time_slot: &'a str,
    pub reason: Option<&'a str>,
}

fn require_user(user_id: &str) -> Result<&str, SchedulingError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(SchedulingError::MissingUser);
    }
    Ok(user_id)
}

// ─── Booking ──────────────────────────────────────────────────────────────────

/// Book a confirmed appointment for `patient_id`. A doctor can hold one
/// booking per slot per date.
pub fn book_appointment(
    conn: &Connection,
    patient_id: &str,
    request: &BookingRequest,
) -> Result<Appointment, SchedulingError> {
    let patient_id = require_user(patient_id)?;
    let doctor = repository::get_doctor(conn, request.doctor_id)?
        .ok_or_else(|| SchedulingError::UnknownDoctor(request.doctor_id.to_string()))?;
    if !doctor.offers_slot(request.time_slot) {
        return Err(SchedulingError::SlotUnavailable {
            doctor_id: doctor.id,
            time_slot: request.time_slot.to_string(),
        });
    }

    let tx = conn.unchecked_transaction()?;
    if repository::is_slot_taken(&tx, &doctor.id, &request.date, request.time_slot)? {
        return Err(SchedulingError::SlotTaken {
            doctor_id: doctor.id,
            date: request.date,
            time_slot: request.time_slot.to_string(),
        });
    }

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id: patient_id.to_string(),
        doctor_id: doctor.id,
        date: request.date,
        time_slot: request.time_slot.to_string(),
        reason: request
            .reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        status: AppointmentStatus::Confirmed,
        created_at: Local::now().naive_local(),
    };
    repository::insert_appointment(&tx, &appointment)?;
    tx.commit()?;

    tracing::info!(
        appointment_id = %appointment.id,
        doctor_id = %appointment.doctor_id,
        date = %appointment.date,
        slot = %appointment.time_slot,
        "Appointment booked"
    );
    Ok(appointment)
}

/// The user's appointments, seen as a doctor or as a patient depending on
/// whether the id is in the doctor directory.
pub fn list_appointments(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<AppointmentDetails>, SchedulingError> {
    let user_id = require_user(user_id)?;
    let role = repository::user_role(conn, user_id)?;
    Ok(repository::list_appointments_for_user(conn, user_id, role)?)
}

// ─── Chat ─────────────────────────────────────────────────────────────────────

fn participant_appointment(
    conn: &Connection,
    user_id: &str,
    appointment_id: &Uuid,
) -> Result<AppointmentDetails, SchedulingError> {
    let details = repository::get_appointment(conn, appointment_id)?.ok_or_else(|| {
        DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: appointment_id.to_string(),
        }
    })?;
    let appt = &details.appointment;
    if appt.patient_id != user_id && appt.doctor_id != user_id {
        return Err(SchedulingError::NotParticipant {
            user_id: user_id.to_string(),
            appointment_id: *appointment_id,
        });
    }
    Ok(details)
}

pub fn send_message(
    conn: &Connection,
    sender_id: &str,
    appointment_id: &Uuid,
    text: &str,
) -> Result<ChatMessage, SchedulingError> {
    let sender_id = require_user(sender_id)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(SchedulingError::EmptyMessage);
    }
    participant_appointment(conn, sender_id, appointment_id)?;

    let message = ChatMessage {
        id: Uuid::new_v4(),
        appointment_id: *appointment_id,
        sender_id: sender_id.to_string(),
        message: text.to_string(),
        sent_at: Local::now().naive_local(),
    };
    repository::insert_message(conn, &message)?;

    tracing::debug!(appointment_id = %appointment_id, message_id = %message.id, "Chat message stored");
    Ok(message)
}

/// The appointment's chat, oldest first.
pub fn list_messages(
    conn: &Connection,
    user_id: &str,
    appointment_id: &Uuid,
) -> Result<Vec<ChatEntry>, SchedulingError> {
    let user_id = require_user(user_id)?;
    participant_appointment(conn, user_id, appointment_id)?;
    Ok(repository::list_messages_for_appointment(conn, appointment_id)?)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
