use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ExtractionMethod, ReportType};
use super::vital_sign::VitalsRecord;

/// An uploaded medical report with the text recognized from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub user_id: String,
    pub file_name: String,
    pub file_type: String,
    pub report_type: ReportType,
    /// The report type as the uploader wrote it ("General" when blank).
    /// `report_type` is its normalized category.
    pub report_label: String,
    pub uploaded_at: NaiveDateTime,
    pub extraction_method: ExtractionMethod,
    pub report_text: String,
    pub vitals: VitalsRecord,
}

/// Vitals from one report, stored separately for trend queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsEntry {
    pub report_id: Uuid,
    pub user_id: String,
    pub recorded_at: NaiveDateTime,
    #[serde(flatten)]
    pub vitals: VitalsRecord,
}

impl VitalsEntry {
    pub fn from_report(report: &Report) -> Self {
        Self {
            report_id: report.id,
            user_id: report.user_id.clone(),
            recorded_at: report.uploaded_at,
            vitals: report.vitals.clone(),
        }
    }
}
