use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::UserRole;

/// One chat line posted on an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub sender_id: String,
    pub message: String,
    pub sent_at: NaiveDateTime,
}

/// A chat line with what is known about its sender. Only doctors have a
/// name on record; patients are opaque ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    #[serde(flatten)]
    pub message: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    pub sender_role: UserRole,
}
