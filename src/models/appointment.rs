use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

/// A doctor in the bookable directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub city: String,
    pub experience: String,
    pub qualifications: String,
    /// Slot labels as shown to patients, e.g. "9:00 AM".
    pub available_slots: Vec<String>,
}

impl Doctor {
    pub fn offers_slot(&self, slot: &str) -> bool {
        self.available_slots.iter().any(|s| s == slot)
    }
}

/// Distinct values a doctor search can be narrowed by.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorFilters {
    pub specializations: Vec<String>,
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
}

/// An appointment joined with the booked doctor's name and specialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor_name: String,
    pub doctor_specialization: String,
}
